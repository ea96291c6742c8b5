//! Services shared by songs and playlists.

use std::sync::Arc;

use crate::config::Settings;
use crate::decoder::{DecoderRegistry, LoftyRegistry};

/// Settings plus the decoder registry, handed to every operation that needs
/// either of them.
#[derive(Clone)]
pub struct Context {
    pub settings: Arc<Settings>,
    pub registry: Arc<dyn DecoderRegistry>,
}

impl Context {
    pub fn new(settings: Settings, registry: Arc<dyn DecoderRegistry>) -> Self {
        Self {
            settings: Arc::new(settings),
            registry,
        }
    }

    /// Context backed by the lofty registry for the configured extensions.
    pub fn with_lofty(settings: Settings) -> Self {
        let registry = Arc::new(LoftyRegistry::new(&settings.library));
        Self::new(settings, registry)
    }

    pub fn title_format(&self) -> Option<&str> {
        self.settings
            .playlist
            .title_format
            .as_deref()
            .filter(|f| !f.is_empty())
    }
}
