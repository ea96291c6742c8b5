use std::sync::Arc;

use lofty::config::WriteOptions;
use lofty::error::LoftyError;
use lofty::prelude::*;
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag};

use crate::config::LibrarySettings;
use crate::song::SongInfo;

use super::{Decoder, DecoderRegistry, FileTags};

/// MIME types `LoftyDecoder` is offered by content sniffing.
const SNIFFABLE: &[&str] = &[
    "audio/mpeg",
    "audio/flac",
    "audio/ogg",
    "audio/wav",
    "audio/aiff",
    "audio/mp4",
    "audio/aac",
    "audio/ape",
    "audio/wavpack",
    "audio/musepack",
];

/// Tag reader/writer for every format `lofty` understands.
#[derive(Debug, Default)]
pub struct LoftyDecoder;

impl Decoder for LoftyDecoder {
    fn name(&self) -> &str {
        "lofty"
    }

    fn read_tags(&self, path: &str) -> Option<FileTags> {
        let tagged = match Probe::open(path).and_then(|p| p.read()) {
            Ok(file) => file,
            Err(e) => {
                log::debug!("no tags for {path}: {e}");
                return None;
            }
        };

        let duration = Some(tagged.properties().duration().as_secs());
        let info = match tagged.primary_tag().or_else(|| tagged.first_tag()) {
            Some(tag) => info_from_tag(tag),
            // Properties only; title fields would all be empty.
            None => SongInfo {
                initialized: true,
                own_only: true,
                ..SongInfo::default()
            },
        };

        Some(FileTags { info, duration })
    }

    fn write_tags(&self, path: &str, info: &SongInfo) -> bool {
        match write_info(path, info) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("cannot write tags to {path}: {e}");
                false
            }
        }
    }
}

fn non_empty(value: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn info_from_tag(tag: &Tag) -> SongInfo {
    SongInfo {
        artist: non_empty(tag.artist()),
        album: non_empty(tag.album()),
        title: non_empty(tag.title()),
        track: tag.track().map(|n| n.to_string()),
        year: tag
            .get_string(&ItemKey::RecordingDate)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        genre: non_empty(tag.genre()),
        comments: non_empty(tag.comment()),
        initialized: true,
        own_only: false,
    }
}

fn write_info(path: &str, info: &SongInfo) -> Result<(), LoftyError> {
    let mut tagged = Probe::open(path)?.read()?;

    let tag_type = tagged.primary_tag_type();
    if tagged.tag(tag_type).is_none() {
        tagged.insert_tag(Tag::new(tag_type));
    }

    if let Some(tag) = tagged.tag_mut(tag_type) {
        match &info.artist {
            Some(v) => tag.set_artist(v.clone()),
            None => tag.remove_artist(),
        }
        match &info.album {
            Some(v) => tag.set_album(v.clone()),
            None => tag.remove_album(),
        }
        match &info.title {
            Some(v) => tag.set_title(v.clone()),
            None => tag.remove_title(),
        }
        match info.track.as_deref().and_then(|t| t.trim().parse::<u32>().ok()) {
            Some(n) => tag.set_track(n),
            None => tag.remove_track(),
        }
        match &info.genre {
            Some(v) => tag.set_genre(v.clone()),
            None => tag.remove_genre(),
        }
        match &info.comments {
            Some(v) => tag.set_comment(v.clone()),
            None => tag.remove_comment(),
        }
        if let Some(year) = &info.year {
            tag.insert_text(ItemKey::RecordingDate, year.clone());
        }
    }

    tagged.save_to_path(path, WriteOptions::default())
}

/// Registry handing out the shared [`LoftyDecoder`].
///
/// Name lookup is limited to the configured audio extensions so the
/// registry agrees with directory discovery on what counts as a song.
#[derive(Debug)]
pub struct LoftyRegistry {
    extensions: Vec<String>,
    decoder: Arc<LoftyDecoder>,
}

impl LoftyRegistry {
    pub fn new(settings: &LibrarySettings) -> Self {
        let extensions = settings
            .extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            extensions,
            decoder: Arc::new(LoftyDecoder),
        }
    }

    fn shared(&self) -> Arc<dyn Decoder> {
        self.decoder.clone()
    }
}

impl DecoderRegistry for LoftyRegistry {
    fn find_by_name(&self, _path: &str, extension: &str) -> Option<Arc<dyn Decoder>> {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        self.extensions
            .iter()
            .any(|e| *e == ext)
            .then(|| self.shared())
    }

    fn find_by_content_sniff(&self, content_type: &str) -> Option<Arc<dyn Decoder>> {
        SNIFFABLE
            .iter()
            .any(|m| m.eq_ignore_ascii_case(content_type))
            .then(|| self.shared())
    }
}
