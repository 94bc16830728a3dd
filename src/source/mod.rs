pub mod http;
pub mod payload;

use std::future::Future;

use crate::corpus::Corpus;
use crate::error::LoadError;

pub use http::HttpSource;
pub use payload::parse_corpus_payload;

/// Where a fresh corpus comes from. Implementations return a corpus that has
/// already passed `Corpus::validate`.
pub trait RemoteSource: Send + Sync {
    fn fetch_corpus(&self, url: &str) -> impl Future<Output = Result<Corpus, LoadError>> + Send;
}
