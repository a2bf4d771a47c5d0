//! Disk cache for the station list.
//!
//! A fetched station list is written to a JSON file stamped with the fetch
//! time, and reused until it is older than the TTL. Unreadable or stale
//! files count as a miss.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::client::StationDto;
use super::error::StationError;

/// One week.
const DEFAULT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Serialize, Deserialize)]
struct CachedStations {
    cached_at: DateTime<Utc>,
    stations: Vec<StationDto>,
}

impl CachedStations {
    /// Written no more than `ttl` before `now`. Timestamps in the future
    /// are not trusted.
    fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match now.signed_duration_since(self.cached_at).to_std() {
            Ok(age) => age < ttl,
            Err(_) => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StationCacheConfig {
    pub path: PathBuf,
    pub ttl: Duration,
}

impl StationCacheConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for StationCacheConfig {
    fn default() -> Self {
        Self::new("stations_cache.json")
    }
}

#[derive(Debug, Clone)]
pub struct StationCache {
    config: StationCacheConfig,
}

impl StationCache {
    pub fn new(config: StationCacheConfig) -> Self {
        Self { config }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// The cached stations, if the file is readable and fresh.
    pub fn load(&self) -> Option<Vec<StationDto>> {
        self.load_at(Utc::now())
    }

    fn load_at(&self, now: DateTime<Utc>) -> Option<Vec<StationDto>> {
        let path = self.path();
        let cached: CachedStations = match fs::read(path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(cached) => cached,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "ignoring unreadable station cache");
                    return None;
                }
            },
            Err(_) => return None,
        };

        if !cached.is_fresh(now, self.config.ttl) {
            debug!(path = %path.display(), cached_at = %cached.cached_at, "station cache is stale");
            return None;
        }
        Some(cached.stations)
    }

    /// Replace the cache with `stations`: write a staging file beside the
    /// target, then rename it into place.
    pub fn save(&self, stations: &[StationDto]) -> Result<(), StationError> {
        let path = self.path();
        let cache_error = |what: &str, e: &dyn std::fmt::Display| StationError::Cache {
            message: format!("{what} {}: {e}", path.display()),
        };

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| cache_error("failed to create directory for", &e))?;
        }

        let json = serde_json::to_vec(&CachedStations {
            cached_at: Utc::now(),
            stations: stations.to_vec(),
        })
        .map_err(|e| cache_error("failed to serialize", &e))?;

        let staging = path.with_extension("json.tmp");
        fs::write(&staging, json).map_err(|e| cache_error("failed to write", &e))?;
        fs::rename(&staging, path).map_err(|e| cache_error("failed to replace", &e))?;

        debug!(path = %path.display(), stations = stations.len(), "wrote station cache");
        Ok(())
    }
}
