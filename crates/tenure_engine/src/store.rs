//! Local persistence: last analysis, per-company record cache and settings.
//!
//! Everything lives under one directory. JSON files mirror the shapes the
//! results are exported in; settings are RON.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tenure_core::{NormalizedRecord, Settings};
use tenure_logging::{tenure_debug, tenure_info, tenure_warn};
use thiserror::Error;

use crate::analyze::{AnalysisResult, UNKNOWN_COMPANY_ID};
use crate::persist::{write_atomic, PersistError};

const LAST_ANALYSIS_FILE: &str = "last_analysis.json";
const CACHE_FILE: &str = "cache.json";
const SETTINGS_FILE: &str = "settings.ron";

/// How long a cached company analysis is served.
pub const CACHE_DURATION_MS: i64 = 24 * 60 * 60 * 1000;
/// Entries older than this are dropped by [`FileStore::cleanup`].
pub const MAX_CACHE_AGE_MS: i64 = 30 * 24 * 60 * 60 * 1000;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ron error: {0}")]
    Ron(#[from] ron::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub timestamp: i64,
    pub expires_at: i64,
    pub data: Vec<NormalizedRecord>,
}

type Cache = BTreeMap<String, CacheEntry>;

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Saves `result` as the last analysis and caches its records. A result
    /// without an identified company is never cached.
    pub fn save_analysis(&self, result: &AnalysisResult) -> Result<(), StoreError> {
        self.write_json(LAST_ANALYSIS_FILE, result)?;
        if result.company_id == UNKNOWN_COMPANY_ID {
            tenure_info!("Stored analysis in {} without caching it", self.dir.display());
            return Ok(());
        }
        let mut cache = self.read_cache()?;
        cache.insert(
            result.company_id.clone(),
            CacheEntry {
                timestamp: result.timestamp,
                expires_at: result.timestamp + CACHE_DURATION_MS,
                data: result.records.clone(),
            },
        );
        self.write_json(CACHE_FILE, &cache)?;
        tenure_info!("Stored analysis for {} in {}", result.company_id, self.dir.display());
        Ok(())
    }

    pub fn last_analysis(&self) -> Result<Option<AnalysisResult>, StoreError> {
        self.read_json(LAST_ANALYSIS_FILE)
    }

    /// Cached records for `company_id` up to and including `expires_at`. An
    /// expired entry is evicted on lookup.
    pub fn cached_records(
        &self,
        company_id: &str,
        now_ms: i64,
    ) -> Result<Option<Vec<NormalizedRecord>>, StoreError> {
        let mut cache = self.read_cache()?;
        let Some(entry) = cache.get(company_id) else {
            return Ok(None);
        };
        if now_ms <= entry.expires_at {
            return Ok(Some(entry.data.clone()));
        }
        tenure_debug!("Cache entry for {} expired; evicting", company_id);
        cache.remove(company_id);
        self.write_json(CACHE_FILE, &cache)?;
        Ok(None)
    }

    /// Drops cache entries older than [`MAX_CACHE_AGE_MS`]. Returns how many went.
    pub fn cleanup(&self, now_ms: i64) -> Result<usize, StoreError> {
        let mut cache = self.read_cache()?;
        let before = cache.len();
        cache.retain(|_, entry| now_ms - entry.timestamp <= MAX_CACHE_AGE_MS);
        let removed = before - cache.len();
        if removed > 0 {
            self.write_json(CACHE_FILE, &cache)?;
            tenure_info!("Removed {} stale cache entries", removed);
        }
        Ok(removed)
    }

    pub fn clear_cache(&self) -> Result<(), StoreError> {
        match fs::remove_file(self.dir.join(CACHE_FILE)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    /// Stored settings, or defaults when missing or unreadable.
    pub fn load_settings(&self) -> Settings {
        let path = self.dir.join(SETTINGS_FILE);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                if err.kind() != io::ErrorKind::NotFound {
                    tenure_warn!("Failed to read {}: {}", path.display(), err);
                }
                return Settings::default();
            }
        };
        match ron::from_str(&text) {
            Ok(settings) => settings,
            Err(err) => {
                tenure_warn!("Failed to parse {}: {}", path.display(), err);
                Settings::default()
            }
        }
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        let text = ron::ser::to_string_pretty(settings, ron::ser::PrettyConfig::new())?;
        write_atomic(&self.dir, SETTINGS_FILE, text.as_bytes())?;
        Ok(())
    }

    fn read_cache(&self) -> Result<Cache, StoreError> {
        Ok(self.read_json(CACHE_FILE)?.unwrap_or_default())
    }

    fn read_json<T: DeserializeOwned>(&self, filename: &str) -> Result<Option<T>, StoreError> {
        match fs::read(self.dir.join(filename)) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, filename: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        write_atomic(&self.dir, filename, &bytes)?;
        Ok(())
    }
}
