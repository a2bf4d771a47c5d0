//! Darwin LDB HTTP client.
//!
//! Fetches departures and arrivals boards (with calling points) from the
//! Rail Data Marketplace LDBWS JSON endpoints and converts them to `Board`s.

use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::board::BoardSource;
use crate::domain::{Board, Crs, Direction};

use super::convert::convert_station_board;
use super::error::DarwinError;
use super::types::StationBoardWithDetails;

/// Default base URL for the departures board API.
pub const DEFAULT_DEPARTURES_URL: &str =
    "https://api1.raildata.org.uk/1010-live-departure-board-dep-with-details/LDBWS";

/// Default base URL for the arrivals board API.
pub const DEFAULT_ARRIVALS_URL: &str =
    "https://api1.raildata.org.uk/1010-live-arrival-board-arr-with-details/LDBWS";

/// Most services Darwin returns on one board.
pub const MAX_ROWS: u8 = 150;

/// Widest time window Darwin accepts, in minutes.
pub const MAX_TIME_WINDOW_MINS: u16 = 120;

/// Configuration for the Darwin client.
#[derive(Debug, Clone)]
pub struct DarwinConfig {
    /// Access token, sent as the x-apikey header
    pub api_key: String,
    /// Base URL for departures boards
    pub departures_url: String,
    /// Base URL for arrivals boards
    pub arrivals_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DarwinConfig {
    /// Create a new config with the given access token.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            departures_url: DEFAULT_DEPARTURES_URL.to_string(),
            arrivals_url: DEFAULT_ARRIVALS_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom departures base URL.
    pub fn with_departures_url(mut self, url: impl Into<String>) -> Self {
        self.departures_url = url.into();
        self
    }

    /// Set a custom arrivals base URL.
    pub fn with_arrivals_url(mut self, url: impl Into<String>) -> Self {
        self.arrivals_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// The request URL for a board. Trailing slashes on the base are ignored.
    fn board_url(&self, crs: &Crs, direction: Direction) -> String {
        let (base, operation) = match direction {
            Direction::Departures => (&self.departures_url, "GetDepBoardWithDetails"),
            Direction::Arrivals => (&self.arrivals_url, "GetArrBoardWithDetails"),
        };
        format!(
            "{}/api/20220120/{operation}/{}",
            base.trim_end_matches('/'),
            crs.as_str()
        )
    }
}

/// Darwin LDB API client.
#[derive(Debug, Clone)]
pub struct DarwinClient {
    http: reqwest::Client,
    config: DarwinConfig,
}

impl DarwinClient {
    /// Create a new Darwin client with the given configuration.
    pub fn new(config: DarwinConfig) -> Result<Self, DarwinError> {
        let mut headers = HeaderMap::new();

        let api_key =
            HeaderValue::from_str(&config.api_key).map_err(|_| DarwinError::ApiError {
                status: 0,
                message: "Invalid access token format".to_string(),
            })?;
        headers.insert("x-apikey", api_key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    /// Get a board with calling points for a station.
    ///
    /// # Arguments
    ///
    /// * `crs` - Station CRS code
    /// * `num_rows` - Number of services to return (clamped to 150)
    /// * `time_window` - Minutes window for results (clamped to 120)
    /// * `direction` - Departures or arrivals
    pub async fn get_board(
        &self,
        crs: &Crs,
        num_rows: u8,
        time_window: u16,
        direction: Direction,
    ) -> Result<Board, DarwinError> {
        let url = self.config.board_url(crs, direction);
        debug!(%url, num_rows, time_window, "fetching board");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("numRows", num_rows.min(MAX_ROWS).to_string()),
                ("timeWindow", time_window.min(MAX_TIME_WINDOW_MINS).to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(DarwinError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DarwinError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DarwinError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        parse_board(&body, direction)
    }
}

/// Parse a board response body.
fn parse_board(body: &str, direction: Direction) -> Result<Board, DarwinError> {
    let board: StationBoardWithDetails =
        serde_json::from_str(body).map_err(|e| DarwinError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })?;

    Ok(convert_station_board(&board, direction)?)
}

impl BoardSource for DarwinClient {
    async fn fetch_board(
        &self,
        station: &Crs,
        rows: u8,
        time_window_mins: u16,
        direction: Direction,
    ) -> Result<Board, DarwinError> {
        self.get_board(station, rows, time_window_mins, direction)
            .await
    }
}
