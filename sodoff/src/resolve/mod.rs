//! Station resolution.
//!
//! Turns free-text station input into a CRS code, falling back to an
//! interactive search when the input doesn't identify a station.

mod fuzzy;
mod prompt;
mod resolver;
mod terminal;

pub use fuzzy::matches;
pub use prompt::{PAGE_SIZE, PickList, PromptError, Prompter, Searcher, Validator};
pub use resolver::{MIN_QUERY_CHARS, ResolveError, StationResolver, search_stations};
pub use terminal::TerminalPrompter;
