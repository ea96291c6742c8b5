//! File discovery: expanding directories into files and classifying them by
//! extension.

mod scan;

pub use scan::{expand, is_audio_file, is_playlist_file};
