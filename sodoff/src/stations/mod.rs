//! Station registry: CRS code → station name.
//!
//! The registry is loaded once at startup from the disk cache, the National
//! Rail stations feed, or the bundled table, in that order, and is read-only
//! for the rest of the session.

mod cache;
mod client;
mod error;
mod registry;

pub use cache::{StationCache, StationCacheConfig};
pub use client::{StationClient, StationClientConfig, StationDto, parse_feed};
pub use error::StationError;
pub use registry::StationRegistry;
