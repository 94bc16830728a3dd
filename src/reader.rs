//! Wiring of loader, corpus and highlight scheduler for a UI shell.

use std::{
    path::Path,
    sync::{Arc, PoisonError, RwLock},
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use crate::cache::{KeyValueCache, SqliteKvStore};
use crate::corpus::{flatten, Coordinate, Corpus, FlatNode};
use crate::highlight::HighlightScheduler;
use crate::loader::{ContentLoader, LoadResult};
use crate::settings::SettingsStore;
use crate::source::{HttpSource, RemoteSource};

const CACHE_FILE: &str = "versefeed.sqlite3";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RowKind {
    SectionHeader,
    Item,
}

/// One list row, owned so it can cross into the shell.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub key: String,
    pub kind: RowKind,
    pub label: String,
    pub coordinate: Option<Coordinate>,
    pub highlighted: bool,
}

pub struct Reader<C, S> {
    loader: ContentLoader<C, S>,
    corpus: RwLock<Option<Arc<Corpus>>>,
    highlight: HighlightScheduler,
}

impl Reader<SqliteKvStore, HttpSource> {
    /// Opens the durable cache and settings under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let settings = SettingsStore::new(data_dir.join(SETTINGS_FILE))?.get();
        let cache = SqliteKvStore::open(data_dir.join(CACHE_FILE))?;
        let source = HttpSource::new().map_err(|err| anyhow!(err))?;
        let loader = ContentLoader::new(cache, source, settings.loader_config());

        Ok(Self::new(loader, settings.highlight_interval()))
    }
}

impl<C, S> Reader<C, S>
where
    C: KeyValueCache,
    S: RemoteSource,
{
    pub fn new(loader: ContentLoader<C, S>, highlight_interval: Duration) -> Self {
        Self {
            loader,
            corpus: RwLock::new(None),
            highlight: HighlightScheduler::new(Default::default(), highlight_interval),
        }
    }

    pub fn loader(&self) -> &ContentLoader<C, S> {
        &self.loader
    }

    pub fn highlight(&self) -> &HighlightScheduler {
        &self.highlight
    }

    pub fn corpus(&self) -> Option<Arc<Corpus>> {
        self.corpus
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub async fn load(&self) -> LoadResult {
        let result = self.loader.load().await;
        self.install(&result);
        result
    }

    pub async fn refresh(&self) -> LoadResult {
        let result = self.loader.refresh().await;
        self.install(&result);
        result
    }

    /// Adopts the corpus carried by `result`, fresh or stale. A failure with
    /// nothing to show keeps whatever was already on screen.
    fn install(&self, result: &LoadResult) {
        let Some(corpus) = result.corpus() else {
            return;
        };

        let mut current = self.corpus.write().unwrap_or_else(PoisonError::into_inner);
        let unchanged = current
            .as_ref()
            .is_some_and(|existing| Arc::ptr_eq(existing, corpus) || existing == corpus);
        if unchanged {
            return;
        }

        self.highlight.replace_corpus(corpus);
        *current = Some(Arc::clone(corpus));
    }

    /// Flattened rows with the current highlight applied.
    pub fn rows(&self) -> Vec<RowView> {
        let Some(corpus) = self.corpus() else {
            return Vec::new();
        };
        let highlighted = self.highlight.current_coordinate();

        flatten(&corpus)
            .iter()
            .map(|node| {
                let (kind, label) = match node {
                    FlatNode::SectionHeader { section, .. } => (
                        RowKind::SectionHeader,
                        format!("{}. {}", section.id, section.title),
                    ),
                    FlatNode::Item { item, .. } => (
                        RowKind::Item,
                        format!("{}. {}", item.ordinal_in_section, item.text),
                    ),
                };
                let coordinate = node.coordinate();
                RowView {
                    key: node.key(),
                    kind,
                    label,
                    coordinate,
                    highlighted: coordinate.is_some() && coordinate == highlighted,
                }
            })
            .collect()
    }

    pub fn select(&self, coordinate: Coordinate) {
        self.highlight.retarget(coordinate);
    }

    /// A tap on row `row_index` of [`rows`](Self::rows). Returns `false` for
    /// header rows and indices past the end, which change nothing.
    pub fn select_row(&self, row_index: usize) -> bool {
        let Some(corpus) = self.corpus() else {
            return false;
        };
        let coordinate = flatten(&corpus)
            .get(row_index)
            .and_then(FlatNode::coordinate);

        match coordinate {
            Some(coordinate) => {
                self.highlight.retarget(coordinate);
                true
            }
            None => false,
        }
    }

    pub fn shutdown(&self) {
        self.highlight.stop();
    }
}

impl<C, S> Drop for Reader<C, S> {
    fn drop(&mut self) {
        self.highlight.stop();
    }
}
