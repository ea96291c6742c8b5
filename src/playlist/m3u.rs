//! Extended M3U persistence.
//!
//! ```text
//! #EXTM3U
//! #EXTINF:<seconds>,<title>
//! <path>
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::song::Song;

use super::Playlist;

const HEADER: &str = "#EXTM3U";
const EXTINF: &str = "#EXTINF:";

/// One playlist record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: String,
    pub title: String,
    pub duration: u64,
}

/// Parse `#EXTINF:<seconds>,<title>`. Unparsable or negative lengths read as 0.
pub fn parse_extinf(line: &str) -> Option<(u64, &str)> {
    let (len, title) = line.strip_prefix(EXTINF)?.split_once(',')?;
    let duration = len.trim().parse::<i64>().map_or(0, |d| d.max(0) as u64);
    Some((duration, title))
}

/// Read the records of an extended M3U stream.
///
/// The first line must be the `#EXTM3U` header. Records are line pairs; a
/// malformed pair is skipped and a trailing half record is ignored.
pub fn read_entries<R: BufRead>(reader: R, source: &Path) -> Result<Vec<Entry>> {
    let mut lines = reader.split(b'\n').map(|line| {
        line.map(|bytes| {
            String::from_utf8_lossy(&bytes)
                .trim_end_matches('\r')
                .to_string()
        })
    });

    let header = lines.next().transpose()?.unwrap_or_default();
    if header.trim_start_matches('\u{feff}') != HEADER {
        return Err(Error::UnknownFileType(source.to_path_buf()));
    }

    let mut entries = Vec::new();
    loop {
        let Some(info) = lines.next().transpose()? else {
            break;
        };
        let Some(path) = lines.next().transpose()? else {
            break;
        };

        match parse_extinf(&info) {
            Some((duration, title)) if !path.is_empty() => entries.push(Entry {
                path,
                title: title.to_string(),
                duration,
            }),
            _ => log::warn!("{}: skipping malformed record {info:?}", source.display()),
        }
    }
    Ok(entries)
}

/// Write `songs` as an extended M3U stream.
pub fn write_entries<W: Write>(mut out: W, songs: &[Song]) -> io::Result<()> {
    writeln!(out, "{HEADER}")?;
    for song in songs {
        writeln!(out, "{EXTINF}{},{}", song.duration(), song.title())?;
        writeln!(out, "{}", song.path())?;
    }
    out.flush()
}

impl Playlist {
    /// Append the songs listed in an extended M3U file. Returns how many
    /// were added.
    ///
    /// Listed titles become the songs' frozen titles. Songs that cannot be
    /// created are skipped with a warning.
    pub fn add_playlist_file(&mut self, path: &Path) -> Result<usize> {
        let file = File::open(path).map_err(|source| Error::NoSuchFile {
            path: path.to_path_buf(),
            source,
        })?;
        let entries = read_entries(BufReader::new(file), path)?;

        let mut added = 0;
        for entry in &entries {
            match self.add_song(&entry.path, Some(&entry.title), entry.duration) {
                Ok(()) => added += 1,
                Err(Error::OutOfMemory) => return Err(Error::OutOfMemory),
                Err(e) => log::warn!("{}: skipping {}: {e}", path.display(), entry.path),
            }
        }
        log::debug!("loaded {added} songs from {}", path.display());
        Ok(added)
    }

    /// Save the list as an extended M3U file, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::NoSuchFile {
            path: path.to_path_buf(),
            source,
        })?;
        write_entries(BufWriter::new(file), &self.items)?;
        Ok(())
    }
}
