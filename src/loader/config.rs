use std::time::Duration;

pub const DEFAULT_SOURCE_URL: &str = "https://api.alquran.cloud/v1/quran/en.asad";

/// 7 days.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub url: String,
    pub ttl: Duration,
    /// `None` leaves the fetch unbounded.
    pub fetch_timeout: Option<Duration>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            ttl: DEFAULT_CACHE_TTL,
            fetch_timeout: Some(DEFAULT_FETCH_TIMEOUT),
        }
    }
}

impl LoaderConfig {
    pub fn ttl_ms(&self) -> i64 {
        i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX)
    }
}
