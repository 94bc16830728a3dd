use std::time::Duration;

use log::{debug, warn};

use crate::corpus::Corpus;
use crate::error::LoadError;

use super::{payload::parse_corpus_payload, RemoteSource};

const DEFAULT_USER_AGENT: &str = concat!("versefeed/", env!("CARGO_PKG_VERSION"));

/// `RemoteSource` over HTTPS using reqwest.
#[derive(Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    /// Client without a transport-level timeout; the loader applies its own.
    pub fn new() -> Result<Self, LoadError> {
        Self::build(None)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, LoadError> {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Result<Self, LoadError> {
        let mut builder = reqwest::Client::builder().user_agent(DEFAULT_USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            LoadError::Transport(format!("Failed to create HTTP client: {e}"))
        })?;
        Ok(Self { client })
    }
}

impl RemoteSource for HttpSource {
    async fn fetch_corpus(&self, url: &str) -> Result<Corpus, LoadError> {
        debug!("fetching corpus from {url}");

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(
                "corpus request to {url} failed (connect={}, timeout={}): {e}",
                e.is_connect(),
                e.is_timeout()
            );
            LoadError::Transport(format!("Request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("corpus request to {url} returned HTTP {status}");
            return Err(LoadError::Transport(format!(
                "API returned status {}",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LoadError::Transport(format!("Failed to read response body: {e}")))?;
        debug!("received {} bytes from {url}", body.len());

        parse_corpus_payload(&body)
    }
}
