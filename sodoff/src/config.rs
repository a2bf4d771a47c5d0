//! Runtime configuration from the environment.

use std::path::PathBuf;

use thiserror::Error;

use crate::darwin::DarwinConfig;
use crate::stations::{StationCacheConfig, StationClientConfig};

/// Environment variable holding the Darwin access token.
pub const TOKEN_ENV_VAR: &str = "NR_ACCESS_TOKEN";

/// Where to request a Darwin access token.
pub const TOKEN_URL: &str = "https://www.nationalrail.co.uk/developers/";

const DEPARTURES_URL_VAR: &str = "DARWIN_DEPARTURES_URL";
const ARRIVALS_URL_VAR: &str = "DARWIN_ARRIVALS_URL";
const STATIONS_KEY_VAR: &str = "NR_STATIONS_KEY";
const STATIONS_CACHE_VAR: &str = "SODOFF_STATIONS_CACHE";

const DEFAULT_STATIONS_CACHE: &str = "stations_cache.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("National Rail API access token not found (NR_ACCESS_TOKEN is not set)")]
    MissingToken,
}

/// Settings read from the environment. Blank variables count as unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub access_token: Option<String>,
    pub departures_url: Option<String>,
    pub arrivals_url: Option<String>,
    /// Key for the stations feed. Without it the registry comes from the
    /// cache or the bundled table.
    pub stations_key: Option<String>,
    pub stations_cache: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        Self {
            access_token: var(TOKEN_ENV_VAR),
            departures_url: var(DEPARTURES_URL_VAR),
            arrivals_url: var(ARRIVALS_URL_VAR),
            stations_key: var(STATIONS_KEY_VAR),
            stations_cache: var(STATIONS_CACHE_VAR)
                .map_or_else(|| PathBuf::from(DEFAULT_STATIONS_CACHE), PathBuf::from),
        }
    }

    /// Darwin client settings. Fails without an access token.
    pub fn darwin_config(&self) -> Result<DarwinConfig, ConfigError> {
        let token = self.access_token.as_deref().ok_or(ConfigError::MissingToken)?;

        let mut config = DarwinConfig::new(token);
        if let Some(url) = &self.departures_url {
            config = config.with_departures_url(url);
        }
        if let Some(url) = &self.arrivals_url {
            config = config.with_arrivals_url(url);
        }
        Ok(config)
    }

    /// Stations feed settings, if a key is configured.
    pub fn station_client_config(&self) -> Option<StationClientConfig> {
        self.stations_key.as_deref().map(StationClientConfig::new)
    }

    pub fn station_cache_config(&self) -> StationCacheConfig {
        StationCacheConfig::new(&self.stations_cache)
    }
}
