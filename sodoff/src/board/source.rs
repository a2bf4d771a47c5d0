//! The board-fetching capability.

use std::future::Future;

use crate::darwin::DarwinError;
use crate::domain::{Board, Crs, Direction};

/// Something that can fetch a live board for a station.
///
/// Implemented by the Darwin HTTP client and the file-backed mock. Callers
/// treat it as a black box: one attempt, no retries.
pub trait BoardSource {
    /// Fetch up to `rows` services at `station` within the next
    /// `time_window_mins` minutes.
    fn fetch_board(
        &self,
        station: &Crs,
        rows: u8,
        time_window_mins: u16,
        direction: Direction,
    ) -> impl Future<Output = Result<Board, DarwinError>>;
}
