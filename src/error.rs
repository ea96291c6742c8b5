//! Error type shared by the song, playlist and persistence layers.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Growing the playlist storage failed.
    #[error("out of memory")]
    OutOfMemory,

    #[error("no such file: {}", path.display())]
    NoSuchFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not an extended M3U playlist.
    #[error("unknown file type: {}", .0.display())]
    UnknownFileType(PathBuf),

    /// No decoder claims the file.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The decoder refused to store tags; the song was re-read from disk.
    #[error("failed to save info to file {0}")]
    MetadataWriteFailed(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Error::OutOfMemory
    }
}
