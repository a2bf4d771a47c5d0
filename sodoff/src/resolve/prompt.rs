//! The interactive prompt capability.
//!
//! The resolver only talks to a `Prompter`. The terminal implementation
//! lives in `terminal`; tests script one.

use std::io;

use thiserror::Error;

/// Validation hook for free-text input. `Err` carries the message shown to
/// the user before re-asking.
pub type Validator<'a> = &'a dyn Fn(&str) -> Result<(), String>;

/// Filter hook for a pick list: does item `index` match the typed query?
pub type Searcher<'a> = &'a dyn Fn(&str, usize) -> bool;

/// Why a prompt ended without an answer.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("interrupted")]
    Interrupted,

    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Something that can ask the user questions.
pub trait Prompter {
    /// Ask for a line of text, re-asking until `validate` accepts it.
    fn input(&mut self, label: &str, validate: Validator<'_>) -> Result<String, PromptError>;

    /// Let the user pick one of `items`, filtering as they type. Returns the
    /// index into `items`.
    fn select(
        &mut self,
        label: &str,
        items: &[String],
        searcher: Searcher<'_>,
    ) -> Result<usize, PromptError>;

    /// Show an informational line.
    fn notice(&mut self, message: &str) -> Result<(), PromptError>;
}

/// Default number of pick-list rows on screen at once.
pub const PAGE_SIZE: usize = 5;

/// State of a filterable pick list: the typed query, the items it keeps and
/// the cursor among them.
pub struct PickList<'a> {
    items: &'a [String],
    searcher: Searcher<'a>,
    query: String,
    filtered: Vec<usize>,
    cursor: usize,
    page_size: usize,
}

impl<'a> PickList<'a> {
    pub fn new(items: &'a [String], searcher: Searcher<'a>) -> Self {
        let mut list = Self {
            items,
            searcher,
            query: String::new(),
            filtered: Vec::new(),
            cursor: 0,
            page_size: PAGE_SIZE,
        };
        list.refilter();
        list
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn push(&mut self, c: char) {
        self.query.push(c);
        self.refilter();
    }

    pub fn backspace(&mut self) {
        if self.query.pop().is_some() {
            self.refilter();
        }
    }

    pub fn up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn down(&mut self) {
        if self.cursor + 1 < self.filtered.len() {
            self.cursor += 1;
        }
    }

    /// Index into the original items under the cursor, if anything matches.
    pub fn selected(&self) -> Option<usize> {
        self.filtered.get(self.cursor).copied()
    }

    /// Number of items that match the query.
    pub fn match_count(&self) -> usize {
        self.filtered.len()
    }

    /// The page of matches around the cursor, flagging the cursor row.
    pub fn visible(&self) -> impl Iterator<Item = (&str, bool)> + '_ {
        let start = (self.cursor + 1).saturating_sub(self.page_size);
        self.filtered
            .iter()
            .enumerate()
            .skip(start)
            .take(self.page_size)
            .map(|(pos, &index)| (self.items[index].as_str(), pos == self.cursor))
    }

    fn refilter(&mut self) {
        let query = &self.query;
        let searcher = self.searcher;
        self.filtered = (0..self.items.len())
            .filter(|&i| searcher(query, i))
            .collect();
        self.cursor = 0;
    }
}
