//! Extended-M3U playlist engine and song model for a console audio player.

pub mod config;
pub mod context;
pub mod decoder;
pub mod error;
pub mod library;
pub mod playlist;
pub mod song;
pub mod ui;

#[cfg(test)]
mod test_support;

pub use context::Context;
pub use error::{Error, Result};
pub use playlist::{Playlist, SearchDirection, SortKey, SortScope};
pub use song::{Song, SongInfo};
