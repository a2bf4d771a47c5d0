//! The in-memory station lookup.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::domain::{Crs, Station};

use super::cache::StationCache;
use super::client::{StationClient, StationDto, parse_feed};
use super::error::StationError;

/// Station table shipped with the binary, used when nothing fresher exists.
const BUNDLED_STATIONS: &str = include_str!("../../data/stations.json");

/// Read-only CRS → station name lookup.
///
/// Backed by a `BTreeMap`, so iteration is always in ascending CRS order.
/// Name searches that take "the first match" depend on that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationRegistry {
    stations: BTreeMap<Crs, String>,
}

impl StationRegistry {
    /// Build a registry from feed entries, dropping entries whose CRS code
    /// is malformed. The feed sends lowercase codes, so they are normalized.
    pub fn from_dtos(stations: impl IntoIterator<Item = StationDto>) -> Self {
        stations
            .into_iter()
            .filter_map(|s| Crs::normalize(&s.crs_code).ok().map(|crs| (crs, s.name)))
            .collect()
    }

    /// The table bundled with the binary.
    pub fn bundled() -> Result<Self, StationError> {
        Ok(Self::from_dtos(parse_feed(BUNDLED_STATIONS)?))
    }

    /// Load the registry for a session.
    ///
    /// Tries the disk cache first, then the stations feed (when a client is
    /// configured, saving the result to the cache), then the bundled table.
    pub async fn load(
        cache: &StationCache,
        client: Option<&StationClient>,
    ) -> Result<Self, StationError> {
        if let Some(stations) = cache.load() {
            let registry = Self::from_dtos(stations);
            if !registry.is_empty() {
                info!(
                    stations = registry.len(),
                    path = %cache.path().display(),
                    "loaded station registry from cache"
                );
                return Ok(registry);
            }
        }

        if let Some(client) = client {
            match client.fetch_all().await {
                Ok(stations) => {
                    if let Err(e) = cache.save(&stations) {
                        warn!(error = %e, "failed to write station cache");
                    }
                    let registry = Self::from_dtos(stations);
                    if !registry.is_empty() {
                        info!(stations = registry.len(), "loaded station registry from feed");
                        return Ok(registry);
                    }
                }
                Err(e) => warn!(error = %e, "station feed unavailable, using bundled table"),
            }
        }

        let registry = Self::bundled()?;
        if registry.is_empty() {
            return Err(StationError::Empty);
        }
        Ok(registry)
    }

    /// Look up a station name by CRS code.
    pub fn name(&self, crs: &Crs) -> Option<&str> {
        self.stations.get(crs).map(String::as_str)
    }

    /// The station name, or the code itself when the registry doesn't know it.
    pub fn display_name(&self, crs: &Crs) -> String {
        self.name(crs).map_or_else(|| crs.to_string(), ToString::to_string)
    }

    pub fn contains(&self, crs: &Crs) -> bool {
        self.stations.contains_key(crs)
    }

    /// The station for a code, if known.
    pub fn station(&self, crs: &Crs) -> Option<Station> {
        self.name(crs).map(|name| Station::new(*crs, name))
    }

    /// All stations in ascending CRS order.
    pub fn iter(&self) -> impl Iterator<Item = (Crs, &str)> {
        self.stations.iter().map(|(crs, name)| (*crs, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

impl FromIterator<(Crs, String)> for StationRegistry {
    fn from_iter<I: IntoIterator<Item = (Crs, String)>>(iter: I) -> Self {
        Self {
            stations: iter.into_iter().collect(),
        }
    }
}
