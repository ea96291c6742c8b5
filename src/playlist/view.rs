use std::fmt;

use super::Playlist;

/// One row of the playlist window, ready to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleRow {
    pub index: usize,
    pub is_now_playing: bool,
    pub is_selected: bool,
    pub title: String,
    pub duration: String,
}

/// Summed durations, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub selection: u64,
    pub list: u64,
}

impl fmt::Display for Totals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", format_hms(self.selection), format_hms(self.list))
    }
}

/// `m:ss`, minutes unbounded.
pub fn format_duration(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// `h:mm:ss`.
pub fn format_hms(secs: u64) -> String {
    format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

impl Playlist {
    /// The rows in the viewport, top to bottom. Always `viewport_height`
    /// long; rows past the end of the list are `None`.
    pub fn visible_rows(&self) -> Vec<Option<VisibleRow>> {
        let selection = self.selection();
        (self.scroll..self.scroll + self.height)
            .map(|index| {
                let song = self.items.get(index)?;
                Some(VisibleRow {
                    index,
                    is_now_playing: self.now_playing == Some(index),
                    is_selected: selection.as_ref().is_some_and(|s| s.contains(&index)),
                    title: song.title(),
                    duration: format_duration(song.duration()),
                })
            })
            .collect()
    }

    pub fn totals(&self) -> Totals {
        let list = self.items.iter().map(|s| s.duration()).sum();
        let selection = self
            .selection()
            .map(|range| self.items[range].iter().map(|s| s.duration()).sum())
            .unwrap_or(0);
        Totals { selection, list }
    }
}
