//! Decoder capabilities consumed by songs.
//!
//! A [`Decoder`] reads and writes tag metadata for one family of audio files;
//! a [`DecoderRegistry`] picks the decoder for a file, first by extension and
//! then by sniffed content type. The default implementation is backed by
//! `lofty` and lives in [`tagged`].

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use lofty::file::FileType;
use lofty::probe::Probe;

use crate::song::SongInfo;

pub mod tagged;

pub use tagged::{LoftyDecoder, LoftyRegistry};

/// Tags read from a file, plus its duration when the decoder could tell.
#[derive(Debug, Clone, Default)]
pub struct FileTags {
    pub info: SongInfo,
    pub duration: Option<u64>,
}

pub trait Decoder: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn read_tags(&self, path: &str) -> Option<FileTags>;

    /// Store `info` in the file. Returns `false` when the decoder refused.
    fn write_tags(&self, path: &str, info: &SongInfo) -> bool;

    fn derive_minimal_title(&self, path: &str) -> String {
        minimal_title(path)
    }
}

pub trait DecoderRegistry: Send + Sync {
    fn find_by_name(&self, path: &str, extension: &str) -> Option<Arc<dyn Decoder>>;

    fn find_by_content_sniff(&self, content_type: &str) -> Option<Arc<dyn Decoder>>;

    /// Guess the MIME type of an open file from its leading bytes.
    ///
    /// The file is rewound afterwards so the caller can keep reading it.
    fn sniff_content_type(&self, file: &mut File) -> Option<String> {
        let file_type = {
            let reader = BufReader::new(&mut *file);
            Probe::new(reader).guess_file_type().ok()?.file_type()
        };
        file.seek(SeekFrom::Start(0)).ok()?;
        file_type.and_then(mime_type).map(str::to_string)
    }
}

/// Title used before any tags are known: the file stem, or the whole path.
pub fn minimal_title(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(path)
        .to_string()
}

pub(crate) fn mime_type(file_type: FileType) -> Option<&'static str> {
    match file_type {
        FileType::Mpeg => Some("audio/mpeg"),
        FileType::Flac => Some("audio/flac"),
        FileType::Vorbis | FileType::Opus | FileType::Speex => Some("audio/ogg"),
        FileType::Wav => Some("audio/wav"),
        FileType::Aiff => Some("audio/aiff"),
        FileType::Mp4 => Some("audio/mp4"),
        FileType::Aac => Some("audio/aac"),
        FileType::Ape => Some("audio/ape"),
        FileType::WavPack => Some("audio/wavpack"),
        FileType::Mpc => Some("audio/musepack"),
        _ => None,
    }
}
