#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use tokio::sync::Notify;
use versefeed_lib::{Corpus, Item, LoadError, RemoteSource, Section};

/// Corpus whose sections hold `sizes[i]` items, with globally unique ids.
pub fn corpus_with_sizes(sizes: &[u32]) -> Corpus {
    let mut next_item_id = 1;
    let mut sections = Vec::new();
    for (index, &len) in sizes.iter().enumerate() {
        let mut items = Vec::new();
        for ordinal in 1..=len {
            items.push(Item {
                id: next_item_id,
                ordinal_in_section: ordinal,
                text: format!("verse {next_item_id}"),
            });
            next_item_id += 1;
        }
        sections.push(Section {
            id: index as u32 + 1,
            title: format!("Surah {}", index + 1),
            native_name: None,
            items,
        });
    }
    Corpus::new(sections)
}

/// Scripted remote source that counts calls and can be taken offline.
#[derive(Clone)]
pub struct FakeSource {
    corpus: Arc<Mutex<Corpus>>,
    online: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl FakeSource {
    pub fn serving(corpus: Corpus) -> Self {
        Self {
            corpus: Arc::new(Mutex::new(corpus)),
            online: Arc::new(AtomicBool::new(true)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn offline() -> Self {
        let source = Self::serving(Corpus::default());
        source.set_online(false);
        source
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn replace_corpus(&self, corpus: Corpus) {
        *self.corpus.lock().unwrap() = corpus;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RemoteSource for FakeSource {
    async fn fetch_corpus(&self, _url: &str) -> Result<Corpus, LoadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.online.load(Ordering::SeqCst) {
            Ok(self.corpus.lock().unwrap().clone())
        } else {
            Err(LoadError::Transport("API returned status 503".into()))
        }
    }
}

/// Source that never answers.
pub struct HangingSource;

impl RemoteSource for HangingSource {
    async fn fetch_corpus(&self, _url: &str) -> Result<Corpus, LoadError> {
        std::future::pending().await
    }
}

/// Holds every fetch until the test calls [`GatedSource::release`].
#[derive(Clone)]
pub struct GatedSource {
    inner: FakeSource,
    gate: Arc<Notify>,
}

impl GatedSource {
    pub fn new(inner: FakeSource) -> Self {
        Self {
            inner,
            gate: Arc::new(Notify::new()),
        }
    }

    /// Lets one pending (or the next) fetch through.
    pub fn release(&self) {
        self.gate.notify_one();
    }
}

impl RemoteSource for GatedSource {
    async fn fetch_corpus(&self, url: &str) -> Result<Corpus, LoadError> {
        self.gate.notified().await;
        self.inner.fetch_corpus(url).await
    }
}
