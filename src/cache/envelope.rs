//! The persisted corpus record: serialized corpus plus its expiry, stored as
//! two string entries. Writing replaces both; there is never more than one
//! envelope.

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};

use crate::corpus::Corpus;
use crate::error::LoadError;

use super::KeyValueCache;

const ENABLE_LOGS: bool = true;

use crate::log_warn;

pub const CORPUS_KEY: &str = "quranData";
pub const EXPIRY_KEY: &str = "quranDataExpiry";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEnvelope {
    pub corpus_json: String,
    /// Epoch milliseconds. A missing or unreadable expiry is stored as 0 so
    /// the envelope counts as expired but can still serve as a fallback.
    pub expires_at_ms: i64,
}

impl CacheEnvelope {
    pub fn new(corpus: &Corpus, expires_at_ms: i64) -> Result<Self> {
        Ok(Self {
            corpus_json: corpus.to_json().context("failed to serialize corpus")?,
            expires_at_ms,
        })
    }

    pub fn is_fresh(&self, now_ms: i64) -> bool {
        now_ms < self.expires_at_ms
    }

    /// Parses and re-validates the stored corpus.
    pub fn decode(&self) -> Result<Corpus, LoadError> {
        let corpus = Corpus::from_json(&self.corpus_json)
            .map_err(|err| LoadError::CacheCorrupt(err.to_string()))?;
        corpus
            .validate()
            .map_err(|err| LoadError::CacheCorrupt(err.to_string()))?;
        Ok(corpus)
    }

    pub fn expires_at_rfc3339(&self) -> String {
        Utc.timestamp_millis_opt(self.expires_at_ms)
            .single()
            .map(|at| at.to_rfc3339())
            .unwrap_or_else(|| self.expires_at_ms.to_string())
    }

    /// `Ok(None)` when no corpus entry exists. Storage failures are errors;
    /// a bad expiry value is not.
    pub async fn read<C: KeyValueCache>(cache: &C) -> Result<Option<Self>> {
        let Some(corpus_json) = cache.get(CORPUS_KEY).await? else {
            return Ok(None);
        };

        let expires_at_ms = match cache.get(EXPIRY_KEY).await? {
            Some(raw) => raw.trim().parse::<i64>().unwrap_or_else(|_| {
                log_warn!("ignoring unreadable cache expiry {raw:?}");
                0
            }),
            None => 0,
        };

        Ok(Some(Self {
            corpus_json,
            expires_at_ms,
        }))
    }

    pub async fn write<C: KeyValueCache>(&self, cache: &C) -> Result<()> {
        cache.set(CORPUS_KEY, &self.corpus_json).await?;
        cache
            .set(EXPIRY_KEY, &self.expires_at_ms.to_string())
            .await?;
        Ok(())
    }

    pub async fn clear<C: KeyValueCache>(cache: &C) -> Result<()> {
        cache.remove(CORPUS_KEY).await?;
        cache.remove(EXPIRY_KEY).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryKvStore;
    use crate::corpus::{Item, Section};

    fn corpus() -> Corpus {
        Corpus::new(vec![Section {
            id: 1,
            title: "Opening".into(),
            native_name: None,
            items: vec![Item {
                id: 1,
                ordinal_in_section: 1,
                text: "first".into(),
            }],
        }])
    }

    #[tokio::test]
    async fn write_then_read_uses_both_entries() {
        let cache = MemoryKvStore::new();
        CacheEnvelope::new(&corpus(), 1_000)
            .unwrap()
            .write(&cache)
            .await
            .unwrap();

        assert_eq!(cache.get(EXPIRY_KEY).await.unwrap().as_deref(), Some("1000"));
        let envelope = CacheEnvelope::read(&cache).await.unwrap().unwrap();
        assert_eq!(envelope.expires_at_ms, 1_000);
        assert_eq!(envelope.decode().unwrap(), corpus());
    }

    #[tokio::test]
    async fn missing_expiry_reads_as_expired() {
        let cache = MemoryKvStore::new();
        cache
            .set(CORPUS_KEY, &corpus().to_json().unwrap())
            .await
            .unwrap();
        cache.set(EXPIRY_KEY, "soon").await.unwrap();

        let envelope = CacheEnvelope::read(&cache).await.unwrap().unwrap();
        assert!(!envelope.is_fresh(0));
        assert!(envelope.decode().is_ok());
    }

    #[tokio::test]
    async fn garbage_corpus_is_cache_corrupt() {
        let cache = MemoryKvStore::new();
        cache.set(CORPUS_KEY, "{not json").await.unwrap();
        cache.set(EXPIRY_KEY, "99").await.unwrap();

        let envelope = CacheEnvelope::read(&cache).await.unwrap().unwrap();
        assert!(matches!(envelope.decode(), Err(LoadError::CacheCorrupt(_))));
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let cache = MemoryKvStore::new();
        CacheEnvelope::new(&corpus(), 5)
            .unwrap()
            .write(&cache)
            .await
            .unwrap();
        CacheEnvelope::clear(&cache).await.unwrap();

        assert!(cache.is_empty());
        assert_eq!(CacheEnvelope::read(&cache).await.unwrap(), None);
    }

    #[test]
    fn freshness_boundary_is_exclusive() {
        let envelope = CacheEnvelope::new(&corpus(), 604_800_000).unwrap();
        assert!(envelope.is_fresh(604_799_999));
        assert!(!envelope.is_fresh(604_800_000));
    }
}
