//! In-memory decoder and registry used by unit tests.

use std::collections::HashMap;
use std::fs::File;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::Settings;
use crate::context::Context;
use crate::decoder::{Decoder, DecoderRegistry, FileTags};
use crate::song::SongInfo;

#[derive(Debug)]
pub struct FakeDecoder {
    tags: Mutex<HashMap<String, FileTags>>,
    pub accept_writes: AtomicBool,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
}

impl Default for FakeDecoder {
    fn default() -> Self {
        Self {
            tags: Mutex::new(HashMap::new()),
            accept_writes: AtomicBool::new(true),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }
}

impl FakeDecoder {
    pub fn set_tags(&self, path: &str, info: SongInfo, duration: Option<u64>) {
        self.tags
            .lock()
            .unwrap()
            .insert(path.to_string(), FileTags { info, duration });
    }
}

impl Decoder for FakeDecoder {
    fn name(&self) -> &str {
        "fake"
    }

    fn read_tags(&self, path: &str) -> Option<FileTags> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.tags.lock().unwrap().get(path).cloned()
    }

    fn write_tags(&self, path: &str, info: &SongInfo) -> bool {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if !self.accept_writes.load(Ordering::SeqCst) {
            return false;
        }
        let mut tags = self.tags.lock().unwrap();
        let entry = tags.entry(path.to_string()).or_default();
        entry.info = info.clone();
        true
    }
}

/// Claims `mp3`/`ogg` by name and `audio/fake` by content.
pub struct FakeRegistry {
    pub decoder: Arc<FakeDecoder>,
    pub claim_names: AtomicBool,
    pub sniffed: Mutex<Option<String>>,
    pub sniffs: AtomicUsize,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self {
            decoder: Arc::new(FakeDecoder::default()),
            claim_names: AtomicBool::new(true),
            sniffed: Mutex::new(None),
            sniffs: AtomicUsize::new(0),
        }
    }
}

impl DecoderRegistry for FakeRegistry {
    fn find_by_name(&self, _path: &str, extension: &str) -> Option<Arc<dyn Decoder>> {
        let known = matches!(extension.to_ascii_lowercase().as_str(), "mp3" | "ogg");
        (known && self.claim_names.load(Ordering::SeqCst)).then(|| {
            let d: Arc<dyn Decoder> = self.decoder.clone();
            d
        })
    }

    fn find_by_content_sniff(&self, content_type: &str) -> Option<Arc<dyn Decoder>> {
        (content_type == "audio/fake").then(|| {
            let d: Arc<dyn Decoder> = self.decoder.clone();
            d
        })
    }

    fn sniff_content_type(&self, _file: &mut File) -> Option<String> {
        self.sniffs.fetch_add(1, Ordering::SeqCst);
        self.sniffed.lock().unwrap().clone()
    }
}

pub fn context_with(settings: Settings) -> (Context, Arc<FakeRegistry>) {
    let registry = Arc::new(FakeRegistry::new());
    let ctx = Context::new(settings, registry.clone());
    (ctx, registry)
}

pub fn context() -> (Context, Arc<FakeRegistry>) {
    context_with(Settings::default())
}
