use std::{
    fs,
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
    time::Duration,
};

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::highlight::DEFAULT_ADVANCE_INTERVAL;
use crate::loader::{LoaderConfig, DEFAULT_CACHE_TTL, DEFAULT_FETCH_TIMEOUT, DEFAULT_SOURCE_URL};

const DEBUG_ENV: &str = "VERSEFEED_DEBUG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ReaderSettings {
    pub source_url: String,
    pub cache_ttl_secs: u64,
    /// 0 disables the fetch timeout.
    pub fetch_timeout_secs: u64,
    pub highlight_interval_ms: u64,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.into(),
            cache_ttl_secs: DEFAULT_CACHE_TTL.as_secs(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT.as_secs(),
            highlight_interval_ms: DEFAULT_ADVANCE_INTERVAL.as_millis() as u64,
        }
    }
}

impl ReaderSettings {
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            url: self.source_url.clone(),
            ttl: Duration::from_secs(self.cache_ttl_secs),
            fetch_timeout: (self.fetch_timeout_secs > 0)
                .then(|| Duration::from_secs(self.fetch_timeout_secs)),
        }
    }

    /// `VERSEFEED_DEBUG=1` speeds the highlight up to one item per second.
    pub fn highlight_interval(&self) -> Duration {
        let debug_mode = std::env::var(DEBUG_ENV)
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        if debug_mode {
            Duration::from_secs(1)
        } else {
            Duration::from_millis(self.highlight_interval_ms.max(1))
        }
    }
}

/// JSON-file backed settings. A missing or unreadable file yields defaults.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<ReaderSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("Ignoring malformed settings at {}: {err}", path.display());
                ReaderSettings::default()
            })
        } else {
            ReaderSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> ReaderSettings {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn update(&self, settings: ReaderSettings) -> Result<()> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        self.persist(&settings)?;
        *guard = settings;
        Ok(())
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: ReaderSettings = serde_json::from_str(&contents)
            .with_context(|| format!("Malformed settings in {}", self.path.display()))?;
        *self.data.write().unwrap_or_else(PoisonError::into_inner) = data;
        Ok(())
    }

    fn persist(&self, data: &ReaderSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory {}", parent.display())
            })?;
        }
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
