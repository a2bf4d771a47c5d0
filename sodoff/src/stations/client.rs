//! National Rail Knowledgebase stations feed client.
//!
//! The feed is one large JSON document listing every station. Only the CRS
//! code and name survive parsing; everything else in the feed is ignored.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::StationError;

/// Default base URL for the stations feed (Rail Data Marketplace).
const DEFAULT_BASE_URL: &str = "https://api1.raildata.org.uk/1010-nationalrail-knowledgebase-stations-feed-_json_---production5_0";

/// Wrapper for the stations response. Also the shape of the bundled table.
#[derive(Debug, Deserialize)]
pub struct StationsResponse {
    pub stations: Vec<StationDto>,
}

/// One station from the feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDto {
    pub crs_code: String,
    pub name: String,
}

impl StationDto {
    pub fn new(crs_code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            crs_code: crs_code.into(),
            name: name.into(),
        }
    }
}

/// Configuration for the stations feed client.
#[derive(Debug, Clone)]
pub struct StationClientConfig {
    /// Marketplace key, sent as the x-apikey header
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl StationClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn stations_url(&self) -> String {
        format!("{}/stations", self.base_url.trim_end_matches('/'))
    }
}

/// Client for the stations feed.
#[derive(Debug, Clone)]
pub struct StationClient {
    http: reqwest::Client,
    url: String,
}

impl StationClient {
    pub fn new(config: StationClientConfig) -> Result<Self, StationError> {
        let key = HeaderValue::from_str(&config.api_key).map_err(|_| StationError::Api {
            status: 0,
            message: "NR_STATIONS_KEY contains characters not allowed in a header".to_string(),
        })?;
        let headers = HeaderMap::from_iter([(HeaderName::from_static("x-apikey"), key)]);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            url: config.stations_url(),
        })
    }

    /// Fetch every station in the feed.
    pub async fn fetch_all(&self) -> Result<Vec<StationDto>, StationError> {
        debug!(url = %self.url, "fetching station list");

        let response = self.http.get(&self.url).send().await?;
        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(StationError::Unauthorized),
            status if status.is_success() => {
                let stations = parse_feed(&response.text().await?)?;
                debug!(stations = stations.len(), "fetched station list");
                Ok(stations)
            }
            status => Err(StationError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

/// Parse a feed document, dropping entries without a code or a name.
pub fn parse_feed(body: &str) -> Result<Vec<StationDto>, StationError> {
    let response: StationsResponse = serde_json::from_str(body).map_err(|e| StationError::Json {
        message: e.to_string(),
    })?;

    Ok(response
        .stations
        .into_iter()
        .filter(|s| !s.crs_code.trim().is_empty() && !s.name.trim().is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stations_url_ignores_trailing_slash() {
        let config = StationClientConfig::new("key").with_base_url("http://localhost:8080/");
        assert_eq!(config.stations_url(), "http://localhost:8080/stations");

        let config = StationClientConfig::new("key");
        assert_eq!(config.stations_url(), format!("{DEFAULT_BASE_URL}/stations"));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn rejects_unprintable_api_key() {
        let config = StationClientConfig::new("bad\nkey").with_timeout(Duration::from_secs(5));
        assert!(matches!(
            StationClient::new(config),
            Err(StationError::Api { status: 0, .. })
        ));
    }

    #[test]
    fn parse_feed_keeps_code_and_name() {
        let json = r#"{"stations": [
            {"crsCode": "kgx", "name": "London Kings Cross", "postcode": "N1 9AL"},
            {"crsCode": "EDB", "name": "Edinburgh"},
            {"crsCode": "", "name": "Nowhere"},
            {"crsCode": "XYZ", "name": "  "}
        ]}"#;

        let stations = parse_feed(json).unwrap();
        assert_eq!(
            stations,
            [
                StationDto::new("kgx", "London Kings Cross"),
                StationDto::new("EDB", "Edinburgh"),
            ]
        );
    }

    #[test]
    fn parse_feed_rejects_garbage() {
        assert!(matches!(parse_feed("<html>"), Err(StationError::Json { .. })));
    }
}
