use serde::Deserialize;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/tunelist/config.toml` or `~/.config/tunelist/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TUNELIST__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playlist: PlaylistSettings,
    pub library: LibrarySettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlaylistSettings {
    /// Title format applied to tagged songs.
    ///
    /// `%p` artist, `%a` album, `%t` title, `%n` track, `%y` year, `%g` genre,
    /// `%c` comments, `%f` file name, `%F` full path, `%e` extension.
    /// Unset or empty renders as "artist - title".
    pub title_format: Option<String>,

    /// Replace `_` with spaces in titles derived from file names.
    pub convert_underscores: bool,

    /// Number of playlist rows. Defaults to the terminal height.
    pub viewport_height: Option<u16>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// File extensions read as playlist files instead of songs.
    pub playlist_extensions: Vec<String>,
    /// Whether to follow symlinks while expanding directories.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "mp3".into(),
                "flac".into(),
                "wav".into(),
                "ogg".into(),
                "opus".into(),
                "m4a".into(),
            ],
            playlist_extensions: vec!["m3u".into(), "m3u8".into()],
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
        }
    }
}
