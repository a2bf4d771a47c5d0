//! Mock Darwin client for running without API access.
//!
//! Loads boards from JSON files in a directory and serves them as if they
//! were live responses. Files are named `{CRS}.json` (served for both
//! directions) or `{CRS}.departures.json` / `{CRS}.arrivals.json` (served
//! for one direction, taking precedence over the shared file).

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::board::BoardSource;
use crate::domain::{Board, Crs, Direction};

use super::convert::convert_station_board;
use super::error::DarwinError;
use super::types::StationBoardWithDetails;

/// Key for a loaded board: the station, and the direction it is limited to.
type MockKey = (Crs, Option<Direction>);

/// Mock Darwin client that serves data from JSON files.
#[derive(Debug, Clone)]
pub struct MockDarwinClient {
    boards: HashMap<MockKey, StationBoardWithDetails>,
}

impl MockDarwinClient {
    /// Load every board file in `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, DarwinError> {
        let data_dir = data_dir.as_ref();
        let mut boards = HashMap::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| {
            DarwinError::MockData(format!("failed to read {}: {e}", data_dir.display()))
        })?;

        for entry in entries {
            let path = entry
                .map_err(|e| DarwinError::MockData(format!("failed to read entry: {e}")))?
                .path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| DarwinError::MockData(format!("invalid filename: {path:?}")))?;
            let key = parse_key(stem)
                .ok_or_else(|| DarwinError::MockData(format!("invalid board filename: {stem}")))?;

            let json = std::fs::read_to_string(&path)
                .map_err(|e| DarwinError::MockData(format!("failed to read {path:?}: {e}")))?;
            let board: StationBoardWithDetails = serde_json::from_str(&json)
                .map_err(|e| DarwinError::MockData(format!("failed to parse {path:?}: {e}")))?;

            boards.insert(key, board);
        }

        if boards.is_empty() {
            return Err(DarwinError::MockData(format!(
                "no board files found in {}",
                data_dir.display()
            )));
        }

        debug!(boards = boards.len(), dir = %data_dir.display(), "loaded mock boards");
        Ok(Self { boards })
    }

    /// Get a board, truncated to `num_rows` services. The time window is
    /// ignored; mock data is static.
    pub fn get_board(
        &self,
        crs: &Crs,
        num_rows: u8,
        direction: Direction,
    ) -> Result<Board, DarwinError> {
        let board = self
            .boards
            .get(&(*crs, Some(direction)))
            .or_else(|| self.boards.get(&(*crs, None)))
            .ok_or_else(|| {
                DarwinError::MockData(format!("no {direction} board for station {crs}"))
            })?;

        let mut board = convert_station_board(board, direction)?;
        board.services.truncate(usize::from(num_rows));
        Ok(board)
    }

    /// Stations with mock data, in CRS order.
    pub fn available_stations(&self) -> Vec<Crs> {
        let mut stations: Vec<Crs> = self.boards.keys().map(|(crs, _)| *crs).collect();
        stations.sort();
        stations.dedup();
        stations
    }
}

/// Parse a file stem such as `KGX` or `KGX.arrivals`.
fn parse_key(stem: &str) -> Option<MockKey> {
    let (code, direction) = match stem.split_once('.') {
        None => (stem, None),
        Some((code, "departures")) => (code, Some(Direction::Departures)),
        Some((code, "arrivals")) => (code, Some(Direction::Arrivals)),
        Some(_) => return None,
    };
    Crs::parse(code).ok().map(|crs| (crs, direction))
}

impl BoardSource for MockDarwinClient {
    async fn fetch_board(
        &self,
        station: &Crs,
        rows: u8,
        _time_window_mins: u16,
        direction: Direction,
    ) -> Result<Board, DarwinError> {
        self.get_board(station, rows, direction)
    }
}
