//! Song entity: one track reference shared between the playlist and the player.
//!
//! A [`Song`] is a cheap handle onto reference-counted song data. Identity
//! (path, short name, extension) is fixed at construction; tags, the decoder,
//! the duration and the display title live behind a per-song lock so metadata
//! can be refreshed while another thread is using the song.

use std::fmt;
use std::fs::File;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::context::Context;
use crate::decoder::{Decoder, minimal_title};
use crate::error::{Error, Result};

mod info;
mod title;

pub use info::SongInfo;
pub use title::{TitleSource, format_title};


/// Decoder lookup state. `Failed` stops repeated lookups for files no
/// decoder claims.
#[derive(Clone, Default)]
enum DecoderSlot {
    #[default]
    Unresolved,
    Failed,
    Resolved(Arc<dyn Decoder>),
}

#[derive(Debug, Clone, Copy, Default)]
struct Flags {
    needs_read: bool,
    needs_write: bool,
    static_info: bool,
}

#[derive(Default)]
struct SongState {
    /// Length reported by the decoder (or given at construction), before trimming.
    length: u64,
    duration: u64,
    decoder: DecoderSlot,
    info: Option<SongInfo>,
    title: String,
    trim_start: Option<u64>,
    trim_end: Option<u64>,
    flags: Flags,
}

struct SongData {
    path: String,
    short_name: String,
    extension: String,
    default_title: Option<String>,
    state: Mutex<SongState>,
}

/// Shared handle to a song.
///
/// Every holder owns one reference: [`Song::acquire`] hands out another and
/// [`Song::release`] (or dropping the handle) gives one back. The song data
/// is freed when the last reference goes.
pub struct Song(Arc<SongData>);

/// Whether `path` names a stream or other non-file resource.
fn is_virtual_path(path: &str) -> bool {
    path.contains("://")
}

fn split_path(path: &str) -> (String, String) {
    let short = path.rsplit('/').next().unwrap_or(path);
    let ext = match short.rfind('.') {
        Some(dot) if dot > 0 => &short[dot + 1..],
        _ => "",
    };
    (short.to_string(), ext.to_string())
}

impl Song {
    /// Create a song for `path`.
    ///
    /// Regular files must be claimed by a decoder, otherwise the song is not
    /// created. An explicit `title` becomes a frozen title that tag updates
    /// never replace; without one the title is derived from the path.
    pub fn new(ctx: &Context, path: &str, title: Option<&str>, duration: u64) -> Result<Song> {
        let (short_name, extension) = split_path(path);

        // The gate only confirms the format; the slot stays unresolved until
        // `resolve_decoder` runs.
        let gate = if is_virtual_path(path) {
            None
        } else {
            let found = ctx
                .registry
                .find_by_name(path, &extension)
                .ok_or_else(|| Error::UnsupportedFormat(path.to_string()))?;
            Some(found)
        };

        let data = SongData {
            path: path.to_string(),
            short_name,
            extension,
            default_title: title.map(str::to_string),
            state: Mutex::new(SongState {
                length: duration,
                duration,
                flags: Flags {
                    needs_read: true,
                    ..Flags::default()
                },
                ..SongState::default()
            }),
        };

        let song = Song(Arc::new(data));
        let title = match &song.0.default_title {
            Some(t) => t.clone(),
            None => song.derive_title(ctx, None, gate.as_ref()),
        };
        song.lock().title = title;
        Ok(song)
    }

    /// Take another reference to this song.
    pub fn acquire(&self) -> Song {
        Song(Arc::clone(&self.0))
    }

    /// Give back this reference. The song is freed with its last reference.
    ///
    /// Taking `self` by value means a handle cannot be released twice.
    pub fn release(self) {
        drop(self);
    }

    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    /// Whether both handles refer to the same song.
    pub fn same(&self, other: &Song) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn path(&self) -> &str {
        &self.0.path
    }

    /// Base name including the extension.
    pub fn short_name(&self) -> &str {
        &self.0.short_name
    }

    pub fn extension(&self) -> &str {
        &self.0.extension
    }

    pub fn is_virtual(&self) -> bool {
        is_virtual_path(&self.0.path)
    }

    pub fn default_title(&self) -> Option<&str> {
        self.0.default_title.as_deref()
    }

    pub fn title(&self) -> String {
        self.lock().title.clone()
    }

    /// Duration in seconds; 0 while unknown.
    pub fn duration(&self) -> u64 {
        self.lock().duration
    }

    pub fn info(&self) -> Option<SongInfo> {
        self.lock().info.clone()
    }

    pub fn needs_read(&self) -> bool {
        self.lock().flags.needs_read
    }

    pub fn needs_write(&self) -> bool {
        self.lock().flags.needs_write
    }

    /// Pin the current tag record: refreshes still read the file but keep it.
    pub fn set_static_info(&self, pinned: bool) {
        self.lock().flags.static_info = pinned;
    }

    /// Play only part of the file. Applied to the duration on the next refresh.
    pub fn set_trim(&self, start: Option<u64>, end: Option<u64>) {
        let mut state = self.lock();
        state.trim_start = start;
        state.trim_end = end;
    }

    /// Replace the tag record with an edited one and queue it for writing.
    pub fn set_info(&self, ctx: &Context, info: SongInfo) {
        let mut state = self.lock();
        state.info = Some(info);
        state.flags.needs_write = true;
        self.update_title(ctx, &mut state);
    }

    /// Re-read tags and duration from the file.
    ///
    /// Skipped while an edited record waits to be written.
    pub fn refresh_metadata(&self, ctx: &Context) {
        let mut state = self.lock();
        if state.flags.needs_write {
            return;
        }

        let (decoder, _) = self.resolve_locked(ctx, &mut state, false);
        let fresh = decoder.and_then(|d| d.read_tags(&self.0.path));
        let (info, length) = match fresh {
            Some(tags) => (Some(tags.info), tags.duration),
            None => (None, None),
        };

        if let Some(length) = length {
            state.length = length;
        }
        state.duration = match (state.trim_start, state.trim_end) {
            (Some(start), Some(end)) => end.saturating_sub(start),
            (Some(start), None) => state.length.saturating_sub(start),
            (None, _) => state.length,
        };

        if !state.flags.static_info {
            state.info = info;
        }

        self.update_title(ctx, &mut state);
        state.flags.needs_read = false;
    }

    /// Recompute the display title from the current tags and return it.
    ///
    /// Frozen titles are returned unchanged.
    pub fn compute_title(&self, ctx: &Context) -> String {
        let mut state = self.lock();
        self.update_title(ctx, &mut state);
        state.title.clone()
    }

    /// Write the tag record back to the file.
    ///
    /// When the decoder refuses, the song is re-read from disk so it matches
    /// the file again and `MetadataWriteFailed` is returned.
    pub fn persist_metadata(&self, ctx: &Context) -> Result<()> {
        let written = {
            let mut state = self.lock();
            let (decoder, _) = self.resolve_locked(ctx, &mut state, false);
            let written = match (&decoder, &state.info) {
                (Some(d), Some(info)) => d.write_tags(&self.0.path, info),
                (None, Some(_)) => false,
                (_, None) => true,
            };
            state.flags.needs_read = false;
            state.flags.needs_write = false;
            written
        };

        if written {
            return Ok(());
        }

        self.refresh_metadata(ctx);
        log::warn!("failed to save info to file {}", self.0.path);
        Err(Error::MetadataWriteFailed(self.0.path.clone()))
    }

    /// Find the decoder for this song, resolving it on first use.
    ///
    /// Extension lookup comes first; failing that the file is opened and its
    /// content sniffed. With `want_handle` the file opened for sniffing is
    /// handed to the caller instead of being closed.
    pub fn resolve_decoder(
        &self,
        ctx: &Context,
        want_handle: bool,
    ) -> (Option<Arc<dyn Decoder>>, Option<File>) {
        let mut state = self.lock();
        self.resolve_locked(ctx, &mut state, want_handle)
    }

    fn resolve_locked(
        &self,
        ctx: &Context,
        state: &mut SongState,
        want_handle: bool,
    ) -> (Option<Arc<dyn Decoder>>, Option<File>) {
        match &state.decoder {
            DecoderSlot::Resolved(d) => return (Some(Arc::clone(d)), None),
            DecoderSlot::Failed => return (None, None),
            DecoderSlot::Unresolved => {}
        }

        if !self.0.extension.is_empty() {
            if let Some(d) = ctx.registry.find_by_name(&self.0.path, &self.0.extension) {
                state.decoder = DecoderSlot::Resolved(Arc::clone(&d));
                return (Some(d), None);
            }
        }

        let mut file = match File::open(&self.0.path) {
            Ok(f) => f,
            Err(e) => {
                log::debug!("cannot open {} to sniff its type: {e}", self.0.path);
                state.decoder = DecoderSlot::Failed;
                return (None, None);
            }
        };

        let found = ctx
            .registry
            .sniff_content_type(&mut file)
            .and_then(|content_type| ctx.registry.find_by_content_sniff(&content_type));
        state.decoder = match &found {
            Some(d) => DecoderSlot::Resolved(Arc::clone(d)),
            None => DecoderSlot::Failed,
        };

        (found, want_handle.then_some(file))
    }

    fn lock(&self) -> MutexGuard<'_, SongState> {
        self.0.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn source(&self) -> TitleSource<'_> {
        TitleSource {
            full_path: &self.0.path,
            short_name: &self.0.short_name,
            extension: &self.0.extension,
        }
    }

    fn update_title(&self, ctx: &Context, state: &mut SongState) {
        if self.0.default_title.is_some() {
            return;
        }
        let decoder = match &state.decoder {
            DecoderSlot::Resolved(d) => Some(d),
            _ => None,
        };
        let title = self.derive_title(ctx, state.info.as_ref(), decoder);
        state.title = title;
    }

    fn derive_title(
        &self,
        ctx: &Context,
        info: Option<&SongInfo>,
        decoder: Option<&Arc<dyn Decoder>>,
    ) -> String {
        if let Some(info) = info.filter(|i| i.has_title_fields()) {
            return format_title(ctx.title_format(), info, &self.source());
        }

        let title = match decoder {
            Some(d) => d.derive_minimal_title(&self.0.path),
            None => minimal_title(&self.0.path),
        };
        if ctx.settings.playlist.convert_underscores {
            title.replace('_', " ")
        } else {
            title
        }
    }
}

impl Clone for Song {
    fn clone(&self) -> Self {
        self.acquire()
    }
}

impl fmt::Debug for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Song")
            .field("path", &self.0.path)
            .field("refs", &self.ref_count())
            .finish()
    }
}
