use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::corpus::Corpus;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LoadStatus {
    Loading,
    Ready,
    Error,
}

/// Outcome of a load as seen by consumers.
///
/// `Failed` may still carry a corpus: when a refresh fails, the last cached
/// corpus is handed back even if it has expired, and the message is purely
/// advisory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadResult {
    #[default]
    Loading,
    Ready(Arc<Corpus>),
    Failed {
        stale: Option<Arc<Corpus>>,
        message: String,
    },
}

impl LoadResult {
    pub fn status(&self) -> LoadStatus {
        match self {
            LoadResult::Loading => LoadStatus::Loading,
            LoadResult::Ready(_) => LoadStatus::Ready,
            LoadResult::Failed { .. } => LoadStatus::Error,
        }
    }

    /// Whatever corpus is renderable, fresh or stale.
    pub fn corpus(&self) -> Option<&Arc<Corpus>> {
        match self {
            LoadResult::Ready(corpus) => Some(corpus),
            LoadResult::Failed { stale, .. } => stale.as_ref(),
            LoadResult::Loading => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            LoadResult::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, LoadResult::Failed { stale: Some(_), .. })
    }

    pub fn snapshot(&self) -> LoadSnapshot {
        let corpus = self.corpus();
        LoadSnapshot {
            status: self.status(),
            section_count: corpus.map_or(0, |c| c.sections().len()),
            item_count: corpus.map_or(0, |c| c.item_count()),
            stale: self.is_stale(),
            error_message: self.error_message().map(str::to_owned),
        }
    }
}

/// Serializable summary for a UI shell that renders a status banner.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoadSnapshot {
    pub status: LoadStatus,
    pub section_count: usize,
    pub item_count: usize,
    pub stale: bool,
    pub error_message: Option<String>,
}
