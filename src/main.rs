use std::{io, path::PathBuf};

use clap::{Parser, ValueEnum};
use ratatui::{Terminal, TerminalOptions, Viewport, backend::CrosstermBackend};

use tunelist::config::Settings;
use tunelist::{Context, Error, Playlist, SearchDirection, SortKey, SortScope, ui};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortBy {
    Title,
    Path,
}

impl From<SortBy> for SortKey {
    fn from(by: SortBy) -> Self {
        match by {
            SortBy::Title => SortKey::Title,
            SortBy::Path => SortKey::Path,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tunelist")]
#[command(about = "List songs and extended M3U playlists in the terminal", long_about = None)]
struct Args {
    /// Sort the whole list before drawing
    #[arg(long, value_enum)]
    sort: Option<SortBy>,

    /// Move the cursor to the first title containing QUERY
    #[arg(long, value_name = "QUERY")]
    search: Option<String>,

    /// Save the resulting list as an extended M3U file
    #[arg(long, value_name = "FILE")]
    save: Option<PathBuf>,

    /// Songs, directories or playlist files to add
    paths: Vec<PathBuf>,
}

fn load_settings() -> Settings {
    match Settings::load() {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                log::warn!("invalid config, using defaults: {msg}");
                Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent listing.
            log::warn!("failed to load config, using defaults: {e}");
            Settings::default()
        }
    }
}

/// Playlist rows: the configured height, else the terminal minus the totals line.
fn viewport_rows(settings: &Settings) -> u16 {
    settings
        .playlist
        .viewport_height
        .or_else(|| {
            crossterm::terminal::size()
                .ok()
                .map(|(_, h)| h.saturating_sub(1))
        })
        .unwrap_or(24)
        .max(1)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let settings = load_settings();
    let rows = viewport_rows(&settings);
    let mut playlist = Playlist::new(Context::with_lofty(settings), 0, rows as usize);

    for path in &args.paths {
        match playlist.add_path(path) {
            Ok(added) => log::info!("{}: {added} songs", path.display()),
            Err(Error::OutOfMemory) => return Err(Error::OutOfMemory.into()),
            Err(e) => eprintln!("tunelist: {}: {e}", path.display()),
        }
    }
    playlist.refresh_pending_metadata();

    if let Some(by) = args.sort {
        playlist.sort(SortScope::Whole, by.into());
    }
    if let Some(query) = &args.search {
        if !playlist.search(query, SearchDirection::Forward) {
            eprintln!("tunelist: no match for {query:?}");
        }
    }
    if let Some(out) = &args.save {
        playlist.save(out)?;
    }

    let mut terminal = Terminal::with_options(
        CrosstermBackend::new(io::stdout()),
        TerminalOptions {
            viewport: Viewport::Inline(rows.saturating_add(1)),
        },
    )?;
    terminal.draw(|f| ui::draw(f, &playlist))?;
    println!();

    Ok(())
}
