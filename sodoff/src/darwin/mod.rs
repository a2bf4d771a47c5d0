//! Darwin LDB (Live Departure Boards) client.
//!
//! Provides an HTTP client for the National Rail Darwin API, plus a
//! file-backed mock that serves the same board format offline.
//!
//! Key characteristics of Darwin:
//! - Times are "HH:MM" strings in UK local time; estimates may instead be
//!   "On time", "Delayed" or "Cancelled"
//! - `Get{Dep,Arr}BoardWithDetails` return calling points inline, so one
//!   request per board is enough

mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use client::{
    DEFAULT_ARRIVALS_URL, DEFAULT_DEPARTURES_URL, DarwinClient, DarwinConfig, MAX_ROWS,
    MAX_TIME_WINDOW_MINS,
};
pub use convert::{ConversionError, convert_service_item, convert_station_board};
pub use error::DarwinError;
pub use mock::MockDarwinClient;
pub use types::{
    ArrayOfCallingPoints, CallingPoint, ServiceItemWithCallingPoints, ServiceLocation,
    StationBoardWithDetails,
};
