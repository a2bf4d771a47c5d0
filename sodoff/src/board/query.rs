//! The board query built from command-line flags.

use std::time::Duration;

use crate::domain::Crs;

/// Default number of services per board.
pub const DEFAULT_ROWS: u8 = 10;

/// Default look-ahead window (minutes).
pub const DEFAULT_TIME_WINDOW_MINS: u16 = 60;

/// Default refresh interval (seconds).
pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// What to show and how often. Built once, after both stations resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardQuery {
    /// Station whose departures board is shown.
    pub departure: Crs,

    /// Station whose arrivals board is shown.
    pub destination: Crs,

    /// Maximum services per board.
    pub rows: u8,

    /// How far ahead each board looks (minutes).
    pub time_window_mins: u16,

    /// Refresh until interrupted instead of showing the boards once.
    pub continuous: bool,

    /// Seconds between refreshes in continuous mode.
    pub interval_secs: u64,

    /// Append the full route of each highlighted service.
    pub show_journeys: bool,
}

impl BoardQuery {
    /// A single-shot query with default rows and time window.
    pub fn new(departure: Crs, destination: Crs) -> Self {
        Self {
            departure,
            destination,
            rows: DEFAULT_ROWS,
            time_window_mins: DEFAULT_TIME_WINDOW_MINS,
            continuous: false,
            interval_secs: DEFAULT_INTERVAL_SECS,
            show_journeys: false,
        }
    }

    /// Returns the refresh interval as a Duration. Never zero.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}
