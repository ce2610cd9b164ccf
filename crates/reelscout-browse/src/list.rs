//! Paginated list controller.
//!
//! [`PagedList`] accumulates pages of one filtered list, deduplicating by
//! identity. It performs no I/O: every fetch is described by a
//! [`FetchTicket`] the caller executes and hands back to
//! [`PagedList::complete`]. Tickets carry the filter key, page number and a
//! session generation, so a response that arrives after a filter change is
//! discarded instead of merged.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use anyhow::Result;

use crate::source::LocalPageSource;

/// Highest page number the upstream provider serves.
pub const DEFAULT_PAGE_CEILING: u32 = 500;

/// A record with a stable identity.
pub trait Identified {
    /// Identity key. Two records with equal ids are the same record.
    type Id: Eq + Hash + Clone;

    /// Returns this record's id.
    fn id(&self) -> Self::Id;
}

/// One fetched page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<T> {
    /// Page entries in upstream order.
    pub items: Vec<T>,
    /// Total number of pages the upstream reports.
    pub total_pages: u32,
    /// Page number the upstream reports for this response.
    pub page_number: u32,
}

/// Claim on a single in-flight fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket<K> {
    filter_key: K,
    page: u32,
    generation: u64,
}

impl<K> FetchTicket<K> {
    /// Filter the page belongs to.
    #[must_use]
    pub const fn filter_key(&self) -> &K {
        &self.filter_key
    }

    /// Page number to fetch (1-based).
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Filter session the ticket was issued in.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// Coarse list status, used as the empty-state signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStatus {
    /// More pages may be requested.
    Idle,
    /// A fetch is in flight.
    Loading,
    /// Every available page has been merged.
    Exhausted,
    /// The first page came back empty.
    NothingFound,
    /// The last fetch failed; no further pages are requested.
    Failed,
}

impl ListStatus {
    /// Short label for status lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Exhausted => "end of list",
            Self::NothingFound => "nothing found",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ListStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of applying a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was merged.
    Merged {
        /// Entries appended.
        added: usize,
        /// Entries dropped as already present.
        duplicates: usize,
    },
    /// The fetch failed and the list stopped paginating.
    Failed,
    /// The ticket belonged to an earlier filter session; nothing changed.
    Stale,
}

/// Observable list state.
#[derive(Debug, Clone)]
pub struct ListState<K, T> {
    /// Accumulated entries, unique by id, in insertion order.
    pub items: Vec<T>,
    /// Last page dispatched (>= 1).
    pub page: u32,
    /// Whether another page may be requested.
    pub has_more: bool,
    /// Whether a fetch is in flight.
    pub is_loading: bool,
    /// Current filter.
    pub filter_key: K,
    /// Coarse status.
    pub status: ListStatus,
    /// Message of the last failure.
    pub error: Option<String>,
}

/// Paginated list controller for one list screen.
#[derive(Debug)]
pub struct PagedList<K, T: Identified> {
    state: ListState<K, T>,
    seen: HashSet<T::Id>,
    generation: u64,
    page_ceiling: u32,
}

impl<K, T> PagedList<K, T>
where
    K: Clone + PartialEq + fmt::Debug,
    T: Identified,
{
    /// Creates an idle list for `filter_key`.
    ///
    /// Call [`reset`](Self::reset) on mount to obtain the first ticket.
    #[must_use]
    pub fn new(filter_key: K) -> Self {
        Self {
            state: ListState {
                items: Vec::new(),
                page: 1,
                has_more: true,
                is_loading: false,
                filter_key,
                status: ListStatus::Idle,
                error: None,
            },
            seen: HashSet::new(),
            generation: 0,
            page_ceiling: DEFAULT_PAGE_CEILING,
        }
    }

    /// Sets the highest page that will ever be requested (minimum 1).
    #[must_use]
    pub fn with_page_ceiling(mut self, ceiling: u32) -> Self {
        self.page_ceiling = ceiling.max(1);
        self
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &ListState<K, T> {
        &self.state
    }

    /// Accumulated entries.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.state.items
    }

    /// Current filter.
    #[must_use]
    pub const fn filter_key(&self) -> &K {
        &self.state.filter_key
    }

    /// Whether another page may be requested.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.state.has_more
    }

    /// Whether a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    /// Coarse status.
    #[must_use]
    pub const fn status(&self) -> ListStatus {
        self.state.status
    }

    /// Highest page that will be requested.
    #[must_use]
    pub const fn page_ceiling(&self) -> u32 {
        self.page_ceiling
    }

    /// Starts a new filter session and claims page 1.
    ///
    /// Clears the entries, abandons any in-flight fetch of the previous
    /// session, and returns the ticket for the first page.
    pub fn reset(&mut self, filter_key: K) -> FetchTicket<K> {
        self.generation = self.generation.wrapping_add(1);
        self.seen.clear();
        self.state.items.clear();
        self.state.filter_key = filter_key;
        self.state.page = 1;
        self.state.has_more = true;
        self.state.is_loading = false;
        self.state.status = ListStatus::Idle;
        self.state.error = None;
        self.claim(1)
    }

    /// Claims a fetch of `page_number`.
    ///
    /// Returns `None` when a fetch is already in flight, no more pages are
    /// available, or the page is outside `1..=page_ceiling`.
    pub fn fetch_page(&mut self, page_number: u32) -> Option<FetchTicket<K>> {
        if self.state.is_loading || !self.state.has_more {
            return None;
        }
        if page_number == 0 || page_number > self.page_ceiling {
            return None;
        }
        Some(self.claim(page_number))
    }

    /// Claims the page after the last dispatched one.
    ///
    /// The page counter advances at dispatch. Past the ceiling the list is
    /// marked exhausted and nothing is claimed.
    pub fn load_next(&mut self) -> Option<FetchTicket<K>> {
        if self.state.is_loading || !self.state.has_more {
            return None;
        }
        let next = self.state.page.saturating_add(1);
        if next > self.page_ceiling {
            self.state.has_more = false;
            self.state.status = ListStatus::Exhausted;
            return None;
        }
        self.fetch_page(next)
    }

    fn claim(&mut self, page_number: u32) -> FetchTicket<K> {
        self.state.is_loading = true;
        self.state.page = page_number;
        self.state.status = ListStatus::Loading;
        FetchTicket {
            filter_key: self.state.filter_key.clone(),
            page: page_number,
            generation: self.generation,
        }
    }

    fn is_current(&self, ticket: &FetchTicket<K>) -> bool {
        self.state.is_loading
            && ticket.generation == self.generation
            && ticket.page == self.state.page
            && ticket.filter_key == self.state.filter_key
    }

    /// Applies the resolution of `ticket`.
    ///
    /// Tickets from an earlier session, or already completed, are ignored.
    /// A failure stops pagination for this session and is never retried.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket<K>,
        result: Result<PageResult<T>>,
    ) -> FetchOutcome {
        if !self.is_current(ticket) {
            tracing::debug!(
                filter = ?ticket.filter_key,
                page = ticket.page,
                "stale page response discarded"
            );
            return FetchOutcome::Stale;
        }
        self.state.is_loading = false;

        match result {
            Ok(page) => {
                let fetched = page.items.len();
                let before = self.state.items.len();
                for item in page.items {
                    if self.seen.insert(item.id()) {
                        self.state.items.push(item);
                    }
                }
                let added = self.state.items.len().saturating_sub(before);
                let duplicates = fetched.saturating_sub(added);

                let last_page = page.total_pages.min(self.page_ceiling);
                self.state.has_more = fetched > 0 && ticket.page < last_page;
                self.state.status = if self.state.has_more {
                    ListStatus::Idle
                } else if self.state.items.is_empty() {
                    ListStatus::NothingFound
                } else {
                    ListStatus::Exhausted
                };

                tracing::debug!(
                    filter = ?ticket.filter_key,
                    page = ticket.page,
                    added,
                    duplicates,
                    has_more = self.state.has_more,
                    "page merged"
                );
                FetchOutcome::Merged { added, duplicates }
            }
            Err(e) => {
                let message = format!("{e:#}");
                tracing::warn!(
                    filter = ?ticket.filter_key,
                    page = ticket.page,
                    error = %message,
                    "page fetch failed"
                );
                self.state.has_more = false;
                self.state.status = ListStatus::Failed;
                self.state.error = Some(message);
                FetchOutcome::Failed
            }
        }
    }

    /// Fetches `ticket` from `source` and applies the result.
    pub async fn drive(
        &mut self,
        source: &(impl LocalPageSource<K, T> + Sync),
        ticket: FetchTicket<K>,
    ) -> FetchOutcome {
        let result = source.fetch_page(&ticket.filter_key, ticket.page).await;
        self.complete(&ticket, result)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};

    use anyhow::bail;
    use tracing::subscriber::with_default;
    use tracing_mock::{expect, subscriber};

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        filter: &'static str,
    }

    impl Identified for Item {
        type Id = u32;

        fn id(&self) -> u32 {
            self.id
        }
    }

    fn page_of(
        filter: &'static str,
        ids: impl IntoIterator<Item = u32>,
        total_pages: u32,
    ) -> PageResult<Item> {
        PageResult {
            items: ids.into_iter().map(|id| Item { id, filter }).collect(),
            total_pages,
            page_number: 1,
        }
    }

    /// Mock source that serves 20-item pages per filter, overlapping the
    /// previous page by `overlap` ids.
    struct MockPageSource {
        total_pages: HashMap<&'static str, u32>,
        overlap: u32,
        call_count: AtomicU32,
    }

    impl MockPageSource {
        fn new(overlap: u32) -> Self {
            Self {
                total_pages: HashMap::from([("popular", 10), ("top_rated", 3), ("empty", 0)]),
                overlap,
                call_count: AtomicU32::new(0),
            }
        }
    }

    impl LocalPageSource<&'static str, Item> for MockPageSource {
        async fn fetch_page(&self, key: &&'static str, page: u32) -> Result<PageResult<Item>> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            let Some(&total_pages) = self.total_pages.get(key) else {
                bail!("HTTP 503 for {key}");
            };
            if page > total_pages {
                return Ok(page_of(*key, [], total_pages));
            }
            let start = (page - 1) * 20;
            let start = start.saturating_sub(if page > 1 { self.overlap } else { 0 });
            let mut result = page_of(*key, start..start + 20, total_pages);
            result.page_number = page;
            Ok(result)
        }
    }

    #[test]
    fn test_new_list_is_idle() {
        // Arrange & Act
        let list: PagedList<&str, Item> = PagedList::new("popular");

        // Assert
        assert!(list.items().is_empty());
        assert_eq!(list.state().page, 1);
        assert!(list.has_more());
        assert!(!list.is_loading());
        assert_eq!(list.status(), ListStatus::Idle);
        assert_eq!(list.page_ceiling(), DEFAULT_PAGE_CEILING);
    }

    #[test]
    fn test_reset_clears_state_and_claims_first_page() {
        // Arrange
        let mut list: PagedList<&str, Item> = PagedList::new("popular");
        let ticket = list.reset("popular");
        list.complete(&ticket, Ok(page_of("popular", 0..20, 10)));
        assert_eq!(list.items().len(), 20);

        // Act
        let ticket = list.reset("top_rated");

        // Assert
        assert!(list.items().is_empty());
        assert_eq!(list.state().page, 1);
        assert!(list.has_more());
        assert!(list.is_loading());
        assert_eq!(ticket.page(), 1);
        assert_eq!(*ticket.filter_key(), "top_rated");
        assert_eq!(*list.filter_key(), "top_rated");
    }

    #[test]
    fn test_claim_is_exclusive_while_loading() {
        // Arrange
        let mut list: PagedList<&str, Item> = PagedList::new("popular");
        let _first = list.reset("popular");

        // Act
        let again = list.fetch_page(2);
        let next = list.load_next();

        // Assert
        assert!(again.is_none());
        assert!(next.is_none());
        assert_eq!(list.state().page, 1);
    }

    #[test]
    fn test_load_next_advances_page_at_dispatch() {
        // Arrange
        let mut list: PagedList<&str, Item> = PagedList::new("popular");
        let ticket = list.reset("popular");
        list.complete(&ticket, Ok(page_of("popular", 0..20, 10)));

        // Act
        let ticket = list.load_next().unwrap();

        // Assert
        assert_eq!(ticket.page(), 2);
        assert_eq!(list.state().page, 2);
        assert_eq!(list.status(), ListStatus::Loading);
    }

    #[test]
    fn test_distinct_pages_never_duplicate_ids() {
        // Arrange
        let mut list: PagedList<&str, Item> = PagedList::new("popular");
        let ticket = list.reset("popular");
        list.complete(&ticket, Ok(page_of("popular", 0..20, 3)));

        // Act
        let ticket = list.load_next().unwrap();
        let outcome = list.complete(&ticket, Ok(page_of("popular", 15..35, 3)));

        // Assert
        assert_eq!(
            outcome,
            FetchOutcome::Merged {
                added: 15,
                duplicates: 5
            }
        );
        let ids: Vec<u32> = list.items().iter().map(|i| i.id).collect();
        let unique: HashSet<u32> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len());
        assert_eq!(ids, (0..35).collect::<Vec<u32>>());
    }

    #[tokio::test]
    async fn test_popular_scenario_ten_pages() {
        // Arrange
        let source = MockPageSource::new(2);
        let mut list: PagedList<&str, Item> = PagedList::new("popular");
        let first = list.reset("popular");
        list.drive(&source, first).await;

        // Act
        for _ in 0..9 {
            let ticket = list.load_next().unwrap();
            list.drive(&source, ticket).await;
        }

        // Assert
        let count = list.items().len();
        assert!((180..=200).contains(&count), "count = {count}");
        assert!(!list.has_more());
        assert_eq!(list.status(), ListStatus::Exhausted);
        assert!(list.load_next().is_none());
        assert_eq!(source.call_count.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_empty_first_page_is_nothing_found() {
        // Arrange
        let mut list: PagedList<&str, Item> = PagedList::new("empty");
        let ticket = list.reset("empty");

        // Act
        let outcome = list.complete(&ticket, Ok(page_of("empty", [], 0)));

        // Assert
        assert_eq!(
            outcome,
            FetchOutcome::Merged {
                added: 0,
                duplicates: 0
            }
        );
        assert!(!list.has_more());
        assert_eq!(list.status(), ListStatus::NothingFound);
        assert!(list.load_next().is_none());
    }

    #[test]
    fn test_empty_later_page_stops_pagination() {
        // Arrange
        let mut list: PagedList<&str, Item> = PagedList::new("popular");
        let ticket = list.reset("popular");
        list.complete(&ticket, Ok(page_of("popular", 0..20, 10)));
        let ticket = list.load_next().unwrap();

        // Act
        list.complete(&ticket, Ok(page_of("popular", [], 10)));

        // Assert
        assert!(!list.has_more());
        assert_eq!(list.status(), ListStatus::Exhausted);
        assert!(list.load_next().is_none());
    }

    #[test]
    fn test_page_ceiling_overrides_total_pages() {
        // Arrange
        let mut list: PagedList<&str, Item> = PagedList::new("popular").with_page_ceiling(2);
        let ticket = list.reset("popular");
        list.complete(&ticket, Ok(page_of("popular", 0..20, 1_000)));
        let ticket = list.load_next().unwrap();

        // Act
        list.complete(&ticket, Ok(page_of("popular", 20..40, 1_000)));

        // Assert
        assert!(!list.has_more());
        assert!(list.load_next().is_none());
        assert!(list.fetch_page(3).is_none());
    }

    #[test]
    fn test_default_ceiling_stops_at_500() {
        // Arrange
        let mut list: PagedList<&str, Item> = PagedList::new("popular");
        let ticket = list.reset("popular");
        list.complete(&ticket, Ok(page_of("popular", 0..20, 1_000)));
        let last = list.fetch_page(DEFAULT_PAGE_CEILING).unwrap();

        // Act
        let outcome = list.complete(&last, Ok(page_of("popular", 9_980..10_000, 1_000)));

        // Assert
        assert_eq!(last.page(), DEFAULT_PAGE_CEILING);
        assert_eq!(
            outcome,
            FetchOutcome::Merged {
                added: 20,
                duplicates: 0
            }
        );
        assert!(!list.has_more());
        assert_eq!(list.status(), ListStatus::Exhausted);
        assert!(list.load_next().is_none());
        assert!(list.fetch_page(DEFAULT_PAGE_CEILING + 1).is_none());
    }

    #[test]
    fn test_filter_change_discards_late_response() {
        // Arrange
        let mut list: PagedList<&str, Item> = PagedList::new("popular");
        let first = list.reset("popular");
        list.complete(&first, Ok(page_of("popular", 0..20, 10)));
        let in_flight = list.load_next().unwrap();

        // Act
        let switched = list.reset("top_rated");
        let late = list.complete(&in_flight, Ok(page_of("popular", 20..40, 10)));
        list.complete(&switched, Ok(page_of("top_rated", 100..120, 3)));

        // Assert
        assert_eq!(late, FetchOutcome::Stale);
        assert_eq!(list.items().len(), 20);
        assert!(list.items().iter().all(|i| i.filter == "top_rated"));
        assert!(list.has_more());
    }

    #[test]
    fn test_reset_to_same_filter_discards_previous_session() {
        // Arrange
        let mut list: PagedList<&str, Item> = PagedList::new("popular");
        let old = list.reset("popular");

        // Act
        let fresh = list.reset("popular");
        let late = list.complete(&old, Ok(page_of("popular", 0..20, 10)));

        // Assert
        assert_eq!(late, FetchOutcome::Stale);
        assert!(list.items().is_empty());
        assert!(list.is_loading());
        assert_ne!(old.generation(), fresh.generation());
    }

    #[test]
    fn test_completing_twice_is_stale() {
        // Arrange
        let mut list: PagedList<&str, Item> = PagedList::new("popular");
        let ticket = list.reset("popular");
        list.complete(&ticket, Ok(page_of("popular", 0..20, 10)));

        // Act
        let again = list.complete(&ticket, Ok(page_of("popular", 40..60, 10)));

        // Assert
        assert_eq!(again, FetchOutcome::Stale);
        assert_eq!(list.items().len(), 20);
    }

    #[test]
    fn test_failure_stops_pagination() {
        // Arrange
        let mut list: PagedList<&str, Item> = PagedList::new("popular");
        let ticket = list.reset("popular");

        // Act
        let outcome = list.complete(&ticket, Err(anyhow::anyhow!("connection reset")));

        // Assert
        assert_eq!(outcome, FetchOutcome::Failed);
        assert!(!list.has_more());
        assert!(!list.is_loading());
        assert_eq!(list.status(), ListStatus::Failed);
        assert_eq!(list.state().error.as_deref(), Some("connection reset"));
        assert!(list.load_next().is_none());
    }

    #[test]
    fn test_failure_logs_warning() {
        // Arrange
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().at_level(tracing::Level::WARN))
            .only()
            .run_with_handle();
        let mut list: PagedList<&str, Item> = PagedList::new("popular");
        let ticket = list.reset("popular");

        // Act
        with_default(subscriber, || {
            list.complete(&ticket, Err(anyhow::anyhow!("HTTP 500")));
        });

        // Assert
        handle.assert_finished();
    }

    #[tokio::test]
    async fn test_drive_failure_from_source() {
        // Arrange
        let source = MockPageSource::new(0);
        let mut list: PagedList<&str, Item> = PagedList::new("missing");
        let ticket = list.reset("missing");

        // Act
        let outcome = list.drive(&source, ticket).await;

        // Assert
        assert_eq!(outcome, FetchOutcome::Failed);
        assert!(list.state().error.as_deref().unwrap().contains("HTTP 503"));
    }
}
