use std::time::Duration;

use thiserror::Error;

/// Failures the content loader can run into. None of these escape
/// `ContentLoader::load`; they are folded into `LoadResult::Failed`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    /// Host unreachable or a non-success HTTP status.
    #[error("{0}")]
    Transport(String),

    /// Payload did not have the expected corpus shape.
    #[error("Invalid data format from API: {0}")]
    Format(String),

    /// The persisted envelope could not be parsed.
    #[error("Cached corpus is corrupt: {0}")]
    CacheCorrupt(String),

    /// The key-value store itself failed.
    #[error("Cache storage failed: {0}")]
    Storage(String),

    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl LoadError {
    pub fn storage(err: anyhow::Error) -> Self {
        LoadError::Storage(format!("{err:#}"))
    }
}
