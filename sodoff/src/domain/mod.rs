//! Domain types for live station boards.
//!
//! Station codes are validated at construction time, so code that receives
//! a `Crs` can trust it. Service records keep Darwin's display strings.

mod service;
mod station;

pub use service::{Board, CANCELLED, CallingPoint, Direction, TrainService};
pub use station::{Crs, InvalidCrs, Station};
