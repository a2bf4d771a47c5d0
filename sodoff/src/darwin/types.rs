//! Darwin API response DTOs.
//!
//! These map directly to the LDB JSON responses for
//! `GetDepBoardWithDetails` and `GetArrBoardWithDetails`. Darwin omits
//! fields rather than sending null, so almost everything is an `Option`.

use serde::Deserialize;

/// A departures or arrivals board with calling points inline.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationBoardWithDetails {
    /// When this response was generated (ISO 8601 datetime).
    pub generated_at: Option<String>,

    /// Human-readable name of the station.
    pub location_name: String,

    /// CRS code of the station.
    pub crs: String,

    /// Train services at this station. Absent when nothing is running.
    pub train_services: Option<Vec<ServiceItemWithCallingPoints>>,

    /// Whether services are available (false during disruption).
    pub are_services_available: Option<bool>,
}

/// A service on the board, including calling points.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItemWithCallingPoints {
    /// Ephemeral Darwin service ID. Only used for log messages.
    #[serde(rename = "serviceID")]
    pub service_id: Option<String>,

    /// Scheduled time of arrival at this station.
    pub sta: Option<String>,

    /// Estimated time of arrival: "On time", "Delayed", "Cancelled" or "HH:MM".
    pub eta: Option<String>,

    /// Scheduled time of departure from this station.
    pub std: Option<String>,

    /// Estimated time of departure: "On time", "Delayed", "Cancelled" or "HH:MM".
    pub etd: Option<String>,

    /// Platform number/letter.
    pub platform: Option<String>,

    /// Train operating company name.
    pub operator: Option<String>,

    /// Origin station(s). More than one for joining services.
    pub origin: Option<Vec<ServiceLocation>>,

    /// Destination station(s). More than one for dividing services.
    pub destination: Option<Vec<ServiceLocation>>,

    /// Stations already visited, one array per portion of the train.
    pub previous_calling_points: Option<Vec<ArrayOfCallingPoints>>,

    /// Stations still to visit, one array per portion of the train.
    pub subsequent_calling_points: Option<Vec<ArrayOfCallingPoints>>,

    /// Reason for delay, when Darwin has one.
    pub delay_reason: Option<String>,
}

/// Wrapper for a list of calling points.
///
/// Darwin wraps calling points to support split/join services, where each
/// array is a different portion of the train. The first array is the main
/// portion.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayOfCallingPoints {
    pub calling_point: Vec<CallingPoint>,
}

/// A single calling point (station stop).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallingPoint {
    /// Human-readable station name.
    pub location_name: String,

    /// CRS code of the station.
    pub crs: String,

    /// Scheduled time.
    pub st: Option<String>,

    /// Estimated time (only before the train has called).
    pub et: Option<String>,

    /// Actual time (only after the train has called).
    pub at: Option<String>,
}

/// Origin or destination location.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLocation {
    pub location_name: String,
    pub crs: String,
}
