//! The playlist: an ordered list of songs with cursor, selection and scroll
//! state.
//!
//! The cursor is the end of the selection the user moves; the anchor is the
//! other end. Outside visual mode the anchor follows the cursor, so the
//! selection is a single row. In visual mode the anchor stays where it was
//! when the mode was entered and the selection spans both ends.
//!
//! The playlist is not internally synchronised: one control thread owns it.
//! Songs are shared, so the player can hold the playing song while the
//! playlist drops its own reference.

use std::ops::RangeInclusive;
use std::path::Path;
use std::sync::Arc;

use crate::context::Context;
use crate::error::{Error, Result};
use crate::library::{expand, is_audio_file, is_playlist_file};
use crate::song::Song;

mod m3u;
mod view;

pub use m3u::{Entry, parse_extinf, read_entries, write_entries};
pub use view::{Totals, VisibleRow, format_duration, format_hms};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortScope {
    /// Only the selected rows.
    Selection,
    Whole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Title,
    Path,
}

impl SortKey {
    fn of(self, song: &Song) -> String {
        match self {
            SortKey::Title => song.title(),
            SortKey::Path => song.path().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Forward,
    Backward,
}

pub struct Playlist {
    ctx: Context,
    items: Vec<Song>,
    anchor: usize,
    cursor: usize,
    visual: bool,
    scroll: usize,
    height: usize,
    start_pos: u16,
    now_playing: Option<usize>,
}

impl Playlist {
    /// Create an empty playlist drawn `height` rows tall from screen row `start_pos`.
    pub fn new(ctx: Context, start_pos: u16, height: usize) -> Self {
        Self {
            ctx,
            items: Vec::new(),
            anchor: 0,
            cursor: 0,
            visual: false,
            scroll: 0,
            height: height.max(1),
            start_pos,
            now_playing: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn songs(&self) -> &[Song] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Song> {
        self.items.get(index)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll
    }

    pub fn viewport_height(&self) -> usize {
        self.height
    }

    /// Frame row the list starts on.
    pub fn start_pos(&self) -> u16 {
        self.start_pos
    }

    pub fn is_visual(&self) -> bool {
        self.visual
    }

    pub fn now_playing_index(&self) -> Option<usize> {
        self.now_playing
    }

    /// The selected rows, whichever end the cursor is on. `None` when empty.
    pub fn selection(&self) -> Option<RangeInclusive<usize>> {
        (!self.items.is_empty())
            .then(|| self.anchor.min(self.cursor)..=self.anchor.max(self.cursor))
    }

    /// Enter or leave visual mode. Leaving collapses the selection onto the cursor.
    pub fn set_visual(&mut self, on: bool) {
        self.visual = on;
        if !on {
            self.anchor = self.cursor;
        }
    }

    pub fn toggle_visual(&mut self) {
        self.set_visual(!self.visual);
    }

    /// Mark the row the player is on. Out-of-range indices clear the mark.
    pub fn set_now_playing(&mut self, index: Option<usize>) {
        self.now_playing = index.filter(|&i| i < self.items.len());
    }

    /// A new reference to the playing song, for the player to hold.
    pub fn now_playing(&self) -> Option<Song> {
        self.now_playing
            .and_then(|i| self.items.get(i))
            .map(Song::acquire)
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.height = height.max(1);
        if !self.items.is_empty() {
            self.keep_cursor_visible();
        }
    }

    /// Append one song. On failure the list is left as it was.
    pub fn add_song(&mut self, path: &str, title: Option<&str>, duration: u64) -> Result<()> {
        self.items.try_reserve(1)?;
        let song = Song::new(&self.ctx, path, title, duration)?;

        let was_empty = self.items.is_empty();
        self.items.push(song);
        if was_empty {
            self.anchor = 0;
            self.cursor = 0;
            self.visual = false;
        }

        log::debug!("added {path} at {}", self.items.len() - 1);
        Ok(())
    }

    /// Add a playlist file, a directory or a single song. Returns how many
    /// songs were added.
    ///
    /// Directory entries that are not recognised audio files are ignored;
    /// songs that cannot be created are skipped with a warning.
    pub fn add_path(&mut self, path: &Path) -> Result<usize> {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::path::absolute(path)?
        };

        let settings = Arc::clone(&self.ctx.settings);
        if is_playlist_file(&path, &settings.library) {
            return self.add_playlist_file(&path);
        }

        let mut added = 0;
        for file in expand(&path, &settings.library) {
            if !is_audio_file(&file, &settings.library) {
                continue;
            }
            let Some(name) = file.to_str() else {
                log::warn!("skipping non UTF-8 path {}", file.display());
                continue;
            };
            match self.add_song(name, None, 0) {
                Ok(()) => added += 1,
                Err(Error::OutOfMemory) => return Err(Error::OutOfMemory),
                Err(e) => log::warn!("skipping {name}: {e}"),
            }
        }
        Ok(added)
    }

    /// Refresh every song whose tags have not been read yet. Returns how many
    /// were refreshed.
    pub fn refresh_pending_metadata(&self) -> usize {
        let mut refreshed = 0;
        for song in self.items.iter().filter(|s| s.needs_read()) {
            song.refresh_metadata(&self.ctx);
            refreshed += 1;
        }
        refreshed
    }

    /// Sort the list or the selection with a stable insertion sort.
    ///
    /// Keys compare byte-wise, so the order is case-sensitive. Rows outside
    /// the sorted range are untouched, and the playing mark follows its song.
    pub fn sort(&mut self, scope: SortScope, key: SortKey) {
        let range = match scope {
            SortScope::Whole => (!self.items.is_empty()).then(|| 0..=self.items.len() - 1),
            SortScope::Selection => self.selection(),
        };
        let Some((start, end)) = range.map(RangeInclusive::into_inner) else {
            return;
        };
        if start >= end {
            return;
        }

        let mut keys: Vec<String> = self.items[start..=end].iter().map(|s| key.of(s)).collect();
        let mut playing = self
            .now_playing
            .filter(|p| (start..=end).contains(p))
            .map(|p| p - start);

        for i in 0..end - start {
            let next = i + 1;
            let mut dest = next;
            while dest > 0 && keys[next] < keys[dest - 1] {
                dest -= 1;
            }
            if dest == next {
                continue;
            }

            keys[dest..=next].rotate_right(1);
            self.items[start + dest..=start + next].rotate_right(1);
            playing = playing.map(|p| match p {
                p if p == next => dest,
                p if p >= dest && p < next => p + 1,
                p => p,
            });
        }

        if let Some(p) = playing {
            self.now_playing = Some(start + p);
        }
        log::debug!("sorted rows {start}..={end} by {key:?}");
    }

    /// Remove the selected rows.
    ///
    /// The playing song is never removed: if it is selected it stays, at the
    /// first selected position, and the rest of the selection goes. The
    /// cursor lands on the first selected position afterwards.
    pub fn remove_selection(&mut self) {
        let Some((start, end)) = self.selection().map(RangeInclusive::into_inner) else {
            return;
        };
        let keep_playing = self.now_playing.filter(|p| (start..=end).contains(p));

        let tail = self.items.split_off(end + 1);
        let mut removed = self.items.split_off(start);
        if let Some(p) = keep_playing {
            self.items.push(removed.remove(p - start));
        }
        self.items.extend(tail);

        let count = removed.len();
        for song in removed {
            song.release();
        }
        self.items.shrink_to_fit();
        log::debug!("removed {count} rows from {start}");

        if self.items.is_empty() {
            self.anchor = 0;
            self.cursor = 0;
            self.scroll = 0;
            self.now_playing = None;
            return;
        }

        self.move_cursor(start as isize, false);
        self.anchor = self.cursor;
        self.now_playing = match self.now_playing {
            Some(_) if keep_playing.is_some() => Some(self.cursor),
            Some(p) if p > end => Some(p - count),
            other => other,
        };
    }

    /// Move the cursor to `y`, or by `y` rows when `relative`.
    ///
    /// When the cursor leaves the viewport the view scrolls by the distance
    /// the cursor moved.
    pub fn move_cursor(&mut self, y: isize, relative: bool) {
        if self.items.is_empty() {
            self.anchor = 0;
            self.cursor = 0;
            self.scroll = 0;
            return;
        }

        let last = self.items.len() as isize - 1;
        let old = self.cursor as isize;
        let target = if relative { old.saturating_add(y) } else { y };
        let cursor = target.clamp(0, last);
        self.cursor = cursor as usize;

        let scroll = self.scroll as isize;
        if cursor < scroll || cursor >= scroll + self.height as isize {
            self.scroll = (scroll + cursor - old).clamp(0, last) as usize;
        }
        self.keep_cursor_visible();

        if !self.visual {
            self.anchor = self.cursor;
        }
    }

    /// Put the cursor on the playing song and scroll it to mid-screen.
    pub fn center_on_playing(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let Some(index) = self.now_playing else {
            return;
        };

        self.cursor = index;
        if !self.visual {
            self.anchor = index;
        }
        self.scroll = index.saturating_sub((self.height + 1) / 2);
        self.keep_cursor_visible();
    }

    /// Find the next song whose title contains `query`, ignoring case,
    /// wrapping around the list. Moves the cursor there on success.
    pub fn search(&mut self, query: &str, direction: SearchDirection) -> bool {
        let len = self.items.len();
        if len == 0 {
            return false;
        }

        let needle = query.to_lowercase();
        let mut index = self.cursor;
        for _ in 0..len {
            index = match direction {
                SearchDirection::Forward => (index + 1) % len,
                SearchDirection::Backward => (index + len - 1) % len,
            };
            if self.items[index].title().to_lowercase().contains(&needle) {
                self.move_cursor(index as isize, false);
                return true;
            }
        }
        false
    }

    /// Drop every song reference and reset the view.
    pub fn clear(&mut self) {
        for song in self.items.drain(..) {
            song.release();
        }
        self.items.shrink_to_fit();
        self.anchor = 0;
        self.cursor = 0;
        self.scroll = 0;
        self.now_playing = None;
    }

    fn keep_cursor_visible(&mut self) {
        let last = self.items.len().saturating_sub(1);
        self.scroll = self.scroll.min(last);
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + self.height {
            self.scroll = self.cursor + 1 - self.height;
        }
    }
}
