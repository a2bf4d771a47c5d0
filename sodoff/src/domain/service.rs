//! Live board types.
//!
//! A `Board` is the list of services at one station in one direction, as
//! delivered by the upstream source. Times are the display strings Darwin
//! sends ("10:15", "On time", "Delayed", "Cancelled").

use std::fmt;

use super::{Crs, Station};

/// The token Darwin uses in time fields for a cancelled service.
pub const CANCELLED: &str = "Cancelled";

/// Which side of the station a board shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Departures,
    Arrivals,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Departures => f.write_str("departures"),
            Direction::Arrivals => f.write_str("arrivals"),
        }
    }
}

/// A stop on a service's route.
///
/// Previous calling points carry an actual time once the train has called;
/// subsequent ones carry an estimate. Darwin never populates both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallingPoint {
    pub name: String,
    pub code: Crs,
    pub actual_time: Option<String>,
    pub estimated_time: Option<String>,
}

impl CallingPoint {
    /// A calling point with no times known.
    pub fn new(code: Crs, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code,
            actual_time: None,
            estimated_time: None,
        }
    }
}

/// A train service as it appears on a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainService {
    /// Scheduled departure (STD); empty when the board omits it.
    pub scheduled_departure: String,
    /// Scheduled arrival (STA).
    pub scheduled_arrival: Option<String>,
    /// Estimated departure (ETD); empty when the board omits it.
    pub estimated_departure: String,
    /// Estimated arrival (ETA).
    pub estimated_arrival: Option<String>,
    pub origin: Station,
    pub destination: Station,
    pub platform: Option<String>,
    pub operator: String,
    pub delay_reason: Option<String>,
    /// Stops already called at, in route order.
    pub previous_calling_points: Vec<CallingPoint>,
    /// Stops still ahead, in route order.
    pub subsequent_calling_points: Vec<CallingPoint>,
}

impl TrainService {
    /// A service between two stations with only the scheduled departure set.
    pub fn new(
        scheduled_departure: impl Into<String>,
        origin: Station,
        destination: Station,
    ) -> Self {
        Self {
            scheduled_departure: scheduled_departure.into(),
            scheduled_arrival: None,
            estimated_departure: String::new(),
            estimated_arrival: None,
            origin,
            destination,
            platform: None,
            operator: String::new(),
            delay_reason: None,
            previous_calling_points: Vec::new(),
            subsequent_calling_points: Vec::new(),
        }
    }
}

/// The services at a station, in upstream (chronological) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub station: Crs,
    pub direction: Direction,
    pub services: Vec<TrainService>,
}

impl Board {
    pub fn new(station: Crs, direction: Direction, services: Vec<TrainService>) -> Self {
        Self {
            station,
            direction,
            services,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}
