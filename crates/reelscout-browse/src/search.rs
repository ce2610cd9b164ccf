//! Type-ahead search controller.
//!
//! Debounces free-text input and hands out a [`SearchTicket`] once typing
//! pauses. Every keystroke supersedes the previous ticket, so results of an
//! older query never overwrite those of a newer one.

use std::time::{Duration, Instant};

use anyhow::Result;
use unicode_normalization::UnicodeNormalization;

use crate::debounce::Debouncer;
use crate::source::LocalSearchSource;

/// Default quiet period before a query is issued.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Trims and NFKC-normalises a query (full-width forms fold to ASCII).
#[must_use]
pub fn normalize_query(text: &str) -> String {
    let folded: String = text.nfkc().collect();
    folded.trim().to_owned()
}

/// Claim on one issued search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    query: String,
    generation: u64,
}

impl SearchTicket {
    /// Normalised query text to send.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Observable search state.
#[derive(Debug, Clone)]
pub struct SearchState<T> {
    /// Raw input text.
    pub query: String,
    /// `None` while no search is active; `Some` (possibly empty) otherwise.
    pub results: Option<Vec<T>>,
    /// Whether a request is in flight.
    pub is_searching: bool,
    /// Highlighted result.
    pub selected_index: Option<usize>,
}

impl<T> Default for SearchState<T> {
    fn default() -> Self {
        Self {
            query: String::new(),
            results: None,
            is_searching: false,
            selected_index: None,
        }
    }
}

/// Type-ahead search controller for one search surface.
#[derive(Debug)]
pub struct TypeaheadSearch<T> {
    state: SearchState<T>,
    debouncer: Debouncer,
    generation: u64,
}

impl<T> Default for TypeaheadSearch<T> {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}

impl<T> TypeaheadSearch<T> {
    /// Creates an idle controller with the given debounce window.
    #[must_use]
    pub fn new(debounce: Duration) -> Self {
        Self {
            state: SearchState::default(),
            debouncer: Debouncer::new(debounce),
            generation: 0,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &SearchState<T> {
        &self.state
    }

    /// Raw input text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.state.query
    }

    /// Results of the latest completed search, if a search is active.
    #[must_use]
    pub fn results(&self) -> Option<&[T]> {
        self.state.results.as_deref()
    }

    /// Whether a request is in flight.
    #[must_use]
    pub const fn is_searching(&self) -> bool {
        self.state.is_searching
    }

    /// Highlighted result index.
    #[must_use]
    pub const fn selected_index(&self) -> Option<usize> {
        self.state.selected_index
    }

    /// Highlighted result.
    #[must_use]
    pub fn selected(&self) -> Option<&T> {
        let index = self.state.selected_index?;
        self.state.results.as_ref()?.get(index)
    }

    /// Whether the overlay has anything to show.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.results.is_some() || self.state.is_searching
    }

    /// Replaces the input text.
    ///
    /// Any outstanding request is superseded. Blank input clears the results
    /// and issues nothing; otherwise the debounce is (re)armed.
    pub fn input(&mut self, text: &str, now: Instant) {
        self.generation = self.generation.wrapping_add(1);
        text.clone_into(&mut self.state.query);
        self.state.selected_index = None;
        self.state.is_searching = false;

        if text.trim().is_empty() {
            self.state.results = None;
            self.debouncer.cancel();
        } else {
            self.debouncer.arm(now);
        }
    }

    /// Issues a ticket once the input has been quiet for the debounce window.
    pub fn poll(&mut self, now: Instant) -> Option<SearchTicket> {
        if !self.debouncer.fire(now) {
            return None;
        }
        let query = normalize_query(&self.state.query);
        if query.is_empty() {
            return None;
        }
        self.state.is_searching = true;
        tracing::debug!(query = %query, "search issued");
        Some(SearchTicket {
            query,
            generation: self.generation,
        })
    }

    /// Applies the resolution of `ticket`.
    ///
    /// Returns `false` when the ticket was superseded by later input and the
    /// result was discarded. A failure yields an empty result list.
    pub fn complete(&mut self, ticket: &SearchTicket, result: Result<Vec<T>>) -> bool {
        if ticket.generation != self.generation || !self.state.is_searching {
            tracing::debug!(query = %ticket.query, "superseded search response discarded");
            return false;
        }
        self.state.is_searching = false;
        self.state.selected_index = None;
        self.state.results = Some(match result {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(query = %ticket.query, error = %format!("{e:#}"), "search failed");
                Vec::new()
            }
        });
        true
    }

    /// Fetches `ticket` from `source` and applies the result.
    pub async fn drive(
        &mut self,
        source: &(impl LocalSearchSource<T> + Sync),
        ticket: SearchTicket,
    ) -> bool {
        let result = source.search(&ticket.query).await;
        self.complete(&ticket, result)
    }

    /// Moves the highlight down, stopping at the last result.
    pub fn select_next(&mut self) {
        let len = self.state.results.as_ref().map_or(0, Vec::len);
        if len == 0 {
            return;
        }
        let last = len.saturating_sub(1);
        self.state.selected_index = Some(
            self.state
                .selected_index
                .map_or(0, |i| i.saturating_add(1).min(last)),
        );
    }

    /// Moves the highlight up; above the first result it clears.
    pub fn select_previous(&mut self) {
        self.state.selected_index = match self.state.selected_index {
            None | Some(0) => None,
            Some(i) => Some(i.saturating_sub(1)),
        };
    }

    /// Clears the input, results and highlight, superseding any request.
    pub fn dismiss(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.state = SearchState::default();
        self.debouncer.cancel();
    }
}

impl<T: Clone> TypeaheadSearch<T> {
    /// Returns the highlighted result and dismisses the overlay.
    ///
    /// Does nothing when no result is highlighted.
    pub fn select(&mut self) -> Option<T> {
        let chosen = self.selected().cloned()?;
        self.dismiss();
        Some(chosen)
    }
}
