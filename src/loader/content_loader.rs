use std::sync::Arc;

use tokio::sync::watch;

use crate::cache::{CacheEnvelope, KeyValueCache};
use crate::corpus::Corpus;
use crate::error::LoadError;
use crate::source::RemoteSource;

use super::{Clock, LoadResult, LoaderConfig, SystemClock};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadMode {
    /// Serve an unexpired cached corpus without touching the network.
    PreferCache,
    /// Always go to the network; the cache is only a fallback.
    ForceRefresh,
}

/// Combines the key-value cache and the remote source into a single load
/// that always ends in `Ready` or `Failed`, never an error.
pub struct ContentLoader<C, S> {
    cache: C,
    source: S,
    config: LoaderConfig,
    clock: Arc<dyn Clock>,
    state_tx: watch::Sender<LoadResult>,
}

impl<C, S> ContentLoader<C, S>
where
    C: KeyValueCache,
    S: RemoteSource,
{
    pub fn new(cache: C, source: S, config: LoaderConfig) -> Self {
        Self::with_clock(cache, source, config, Arc::new(SystemClock))
    }

    pub fn with_clock(cache: C, source: S, config: LoaderConfig, clock: Arc<dyn Clock>) -> Self {
        let (state_tx, _) = watch::channel(LoadResult::Loading);
        Self {
            cache,
            source,
            config,
            clock,
            state_tx,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Latest published result. `Loading` until the first load finishes.
    pub fn current(&self) -> LoadResult {
        self.state_tx.borrow().clone()
    }

    /// Observes `Loading` while a load is running, then its outcome.
    pub fn subscribe(&self) -> watch::Receiver<LoadResult> {
        self.state_tx.subscribe()
    }

    /// Fresh cache if there is one, otherwise the network, otherwise
    /// whatever the cache still holds.
    pub async fn load(&self) -> LoadResult {
        self.run(LoadMode::PreferCache).await
    }

    /// Like [`load`](Self::load) but skips the fresh-cache shortcut.
    pub async fn refresh(&self) -> LoadResult {
        self.run(LoadMode::ForceRefresh).await
    }

    /// Drops the persisted envelope so the next load goes to the network.
    pub async fn invalidate(&self) -> Result<(), LoadError> {
        CacheEnvelope::clear(&self.cache)
            .await
            .map_err(LoadError::storage)?;
        log_info!("corpus cache invalidated");
        Ok(())
    }

    async fn run(&self, mode: LoadMode) -> LoadResult {
        self.state_tx.send_replace(LoadResult::Loading);
        let result = self.resolve(mode).await;
        self.state_tx.send_replace(result.clone());
        result
    }

    async fn resolve(&self, mode: LoadMode) -> LoadResult {
        if mode == LoadMode::PreferCache {
            if let Some(corpus) = self.fresh_cached_corpus().await {
                return LoadResult::Ready(Arc::new(corpus));
            }
        }

        match self.fetch_remote().await {
            Ok(corpus) => {
                self.store(&corpus).await;
                LoadResult::Ready(Arc::new(corpus))
            }
            Err(err) => {
                log_error!("Error fetching corpus from {}: {err}", self.config.url);
                let stale = self.stale_cached_corpus().await.map(Arc::new);
                if stale.is_some() {
                    log_warn!("serving expired cached corpus after failed refresh");
                }
                LoadResult::Failed {
                    stale,
                    message: err.to_string(),
                }
            }
        }
    }

    async fn fresh_cached_corpus(&self) -> Option<Corpus> {
        let envelope = match CacheEnvelope::read(&self.cache).await {
            Ok(Some(envelope)) => envelope,
            Ok(None) => {
                log_debug!("no cached corpus");
                return None;
            }
            Err(err) => {
                log_warn!("cache read failed: {err:#}");
                return None;
            }
        };

        if !envelope.is_fresh(self.clock.now_ms()) {
            log_info!(
                "cached corpus expired at {}, refreshing",
                envelope.expires_at_rfc3339()
            );
            return None;
        }

        match envelope.decode() {
            Ok(corpus) => {
                log_debug!(
                    "serving cached corpus ({} sections) valid until {}",
                    corpus.sections().len(),
                    envelope.expires_at_rfc3339()
                );
                Some(corpus)
            }
            Err(err) => {
                log_warn!("{err}");
                None
            }
        }
    }

    /// Ignores expiry; only used once the network has already failed.
    async fn stale_cached_corpus(&self) -> Option<Corpus> {
        match CacheEnvelope::read(&self.cache).await {
            Ok(Some(envelope)) => match envelope.decode() {
                Ok(corpus) => Some(corpus),
                Err(err) => {
                    log_error!("Error reading cached data: {err}");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                log_error!("Error reading cached data: {err:#}");
                None
            }
        }
    }

    async fn fetch_remote(&self) -> Result<Corpus, LoadError> {
        let fetch = self.source.fetch_corpus(&self.config.url);
        let corpus = match self.config.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, fetch)
                .await
                .map_err(|_| LoadError::Timeout(limit))??,
            None => fetch.await?,
        };
        corpus.validate()?;
        Ok(corpus)
    }

    /// A failed write is logged; the fetched corpus is still usable.
    async fn store(&self, corpus: &Corpus) {
        let expires_at_ms = self.clock.now_ms().saturating_add(self.config.ttl_ms());
        let envelope = match CacheEnvelope::new(corpus, expires_at_ms) {
            Ok(envelope) => envelope,
            Err(err) => {
                log_error!("failed to cache corpus: {err:#}");
                return;
            }
        };

        match envelope.write(&self.cache).await {
            Ok(()) => log_info!(
                "cached corpus ({} sections) until {}",
                corpus.sections().len(),
                envelope.expires_at_rfc3339()
            ),
            Err(err) => log_error!("failed to cache corpus: {err:#}"),
        }
    }
}
