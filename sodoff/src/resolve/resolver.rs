//! Station resolution: turn what the user typed into a CRS code.
//!
//! Resolution tries, in order:
//! 1. the input as a CRS code known to the registry
//! 2. the first station (in CRS order) whose name contains the input
//! 3. an interactive search: ask for a query, list the stations it matches,
//!    let the user pick one
//!
//! Empty input goes straight to the interactive search.

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{Crs, Station};
use crate::stations::StationRegistry;

use super::fuzzy::matches;
use super::prompt::{PromptError, Prompter};

/// Shortest query the interactive search accepts.
pub const MIN_QUERY_CHARS: usize = 2;

const NO_MATCHES: &str = "No stations found, please try again.";
const SELECT_LABEL: &str = "Select Station";

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The user interrupted a prompt, or the terminal failed.
    #[error("station selection aborted: {0}")]
    Aborted(#[from] PromptError),
}

/// Every station whose name contains `query`, ignoring case, in CRS order.
pub fn search_stations(registry: &StationRegistry, query: &str) -> Vec<Station> {
    registry
        .iter()
        .filter(|(_, name)| matches(query, name))
        .map(|(code, name)| Station::new(code, name))
        .collect()
}

fn validate_query(query: &str) -> Result<(), String> {
    if query.chars().count() < MIN_QUERY_CHARS {
        Err(format!(
            "search query must be at least {MIN_QUERY_CHARS} characters"
        ))
    } else {
        Ok(())
    }
}

/// Where the interactive search is.
#[derive(Debug)]
enum SearchState {
    /// Waiting for the user to type a query.
    AwaitInput,
    /// Looking the query up in the registry.
    Searching(String),
    /// Nothing matched; tell the user and ask again.
    NoMatches,
    /// Showing the matches for selection.
    Presenting(Vec<Station>),
    Resolved(Crs),
    Aborted(PromptError),
}

/// Resolves station input against a registry, prompting when it has to.
pub struct StationResolver<'a, P: Prompter> {
    registry: &'a StationRegistry,
    prompter: &'a mut P,
}

impl<'a, P: Prompter> StationResolver<'a, P> {
    pub fn new(registry: &'a StationRegistry, prompter: &'a mut P) -> Self {
        Self { registry, prompter }
    }

    /// Resolve `input` to a CRS code. `label` heads the interactive prompt
    /// if one is needed.
    pub fn resolve(&mut self, input: &str, label: &str) -> Result<Crs, ResolveError> {
        let input = input.trim();
        if input.is_empty() {
            return self.search(label);
        }

        if let Ok(code) = Crs::normalize(input) {
            if self.registry.contains(&code) {
                info!(%code, "resolved station by code");
                return Ok(code);
            }
        }

        if let Some(station) = search_stations(self.registry, input).into_iter().next() {
            info!(input, code = %station.code, name = %station.name, "resolved station by name");
            return Ok(station.code);
        }

        warn!(input, "invalid station");
        self.search(label)
    }

    /// Run the interactive search until a station is picked or the user
    /// gives up.
    fn search(&mut self, label: &str) -> Result<Crs, ResolveError> {
        let mut state = SearchState::AwaitInput;

        loop {
            state = match state {
                SearchState::AwaitInput => match self.prompter.input(label, &validate_query) {
                    Ok(query) => SearchState::Searching(query),
                    Err(e) => SearchState::Aborted(e),
                },
                SearchState::Searching(query) => {
                    let candidates = search_stations(self.registry, &query);
                    if candidates.is_empty() {
                        SearchState::NoMatches
                    } else {
                        SearchState::Presenting(candidates)
                    }
                }
                SearchState::NoMatches => match self.prompter.notice(NO_MATCHES) {
                    Ok(()) => SearchState::AwaitInput,
                    Err(e) => SearchState::Aborted(e),
                },
                SearchState::Presenting(candidates) => self.present(&candidates),
                SearchState::Resolved(code) => {
                    info!(%code, "resolved station interactively");
                    return Ok(code);
                }
                SearchState::Aborted(e) => return Err(ResolveError::Aborted(e)),
            };
        }
    }

    fn present(&mut self, candidates: &[Station]) -> SearchState {
        let names: Vec<String> = candidates.iter().map(|s| s.name.clone()).collect();
        let searcher = |input: &str, index: usize| matches(input, &names[index]);

        match self.prompter.select(SELECT_LABEL, &names, &searcher) {
            Ok(index) => match candidates.get(index) {
                Some(station) => SearchState::Resolved(station.code),
                None => SearchState::AwaitInput,
            },
            Err(e) => SearchState::Aborted(e),
        }
    }
}
