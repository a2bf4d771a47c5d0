//! Board classification, highlighting and rendering.
//!
//! Everything here is pure except `TerminalEmitter`: a `Board` goes in, a
//! `BoardTable` or `StyledText` comes out, and an `Emit` implementation puts
//! it on screen.

mod classify;
mod journey;
mod output;
mod query;
mod render;
mod source;

pub use classify::{Status, classify};
pub use journey::{NOT_AVAILABLE, format_journey, is_highlighted};
pub use output::{Emit, Line, Span, Style, StyledText, TerminalEmitter};
pub use query::{BoardQuery, DEFAULT_INTERVAL_SECS, DEFAULT_ROWS, DEFAULT_TIME_WINDOW_MINS};
pub use render::{BoardRenderer, BoardRow, BoardTable, COLUMN_WIDTHS};
pub use source::BoardSource;
