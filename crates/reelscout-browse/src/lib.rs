//! List, scroll and search controllers for reelscout.
//!
//! The controllers are plain state machines: they decide what to fetch and
//! merge what comes back, while the caller owns the runtime and the view.

pub mod catalog;
pub mod debounce;
pub mod list;
pub mod scroll;
pub mod search;
pub mod source;

pub use catalog::{MediaDetails, TmdbCatalog};
pub use debounce::Debouncer;
pub use list::{
    DEFAULT_PAGE_CEILING, FetchOutcome, FetchTicket, Identified, ListState, ListStatus,
    PageResult, PagedList,
};
pub use scroll::{ScrollConfig, ScrollMetrics, ScrollSensor};
pub use search::{DEFAULT_SEARCH_DEBOUNCE, SearchState, SearchTicket, TypeaheadSearch};
pub use source::{LocalPageSource, LocalSearchSource, PageSource, SearchSource};
