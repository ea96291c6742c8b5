/// Tag record attached to a song. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongInfo {
    pub artist: Option<String>,
    pub album: Option<String>,
    pub title: Option<String>,
    pub track: Option<String>,
    pub year: Option<String>,
    pub genre: Option<String>,
    pub comments: Option<String>,

    /// Set once a decoder has filled the record.
    pub initialized: bool,
    /// The record carries no meaningful title fields (for example a file
    /// with audio properties but no tag), so titles come from the path.
    pub own_only: bool,
}

impl SongInfo {
    /// Whether the record can drive a formatted title.
    pub fn has_title_fields(&self) -> bool {
        self.initialized && !self.own_only
    }
}
