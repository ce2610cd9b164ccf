//! Data-source traits the controllers fetch through.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use crate::list::PageResult;

/// Paged data source keyed by a filter.
///
/// Uses `trait_variant::make` to generate a `Send`-bound variant so fetches
/// can be spawned onto the runtime.
#[trait_variant::make(PageSource: Send)]
pub trait LocalPageSource<K, T> {
    /// Fetches one page (1-based) of the list selected by `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream request fails.
    async fn fetch_page(&self, key: &K, page: u32) -> Result<PageResult<T>>;
}

/// Free-text search source.
#[trait_variant::make(SearchSource: Send)]
pub trait LocalSearchSource<T> {
    /// Returns the results for an already normalised, non-blank query.
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream request fails.
    async fn search(&self, query: &str) -> Result<Vec<T>>;
}
