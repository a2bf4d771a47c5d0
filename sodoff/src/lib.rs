//! Live train boards between two stations.
//!
//! Resolves a departure and a destination station from free text, then shows
//! the departures board at one and the arrivals board at the other, marking
//! services that still call at the other end. Optionally refreshes on a
//! timer.

pub mod board;
pub mod config;
pub mod darwin;
pub mod domain;
pub mod refresh;
pub mod resolve;
pub mod stations;
