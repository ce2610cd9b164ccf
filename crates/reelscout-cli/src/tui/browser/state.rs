//! Feed browser TUI state management.

use std::time::Instant;

use anyhow::Result;
use ratatui::widgets::TableState;
use reelscout_api::tmdb::{Feed, MediaItem, Route};
use reelscout_browse::{
    FetchOutcome, FetchTicket, MediaDetails, PageResult, PagedList, ScrollConfig, ScrollMetrics,
    ScrollSensor, SearchTicket, TypeaheadSearch,
};

/// Input mode for the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// List navigation.
    Normal,
    /// Typing into the search overlay.
    Search,
}

/// Content of the detail pane.
#[derive(Debug)]
pub enum DetailPane {
    /// Pane closed.
    Hidden,
    /// Request in flight.
    Loading(Route),
    /// Record loaded.
    Loaded(Box<MediaDetails>),
    /// Request failed.
    Failed(String),
}

/// Fetch the event loop should start.
#[derive(Debug)]
pub enum Request {
    /// Next page of the active feed.
    Page(FetchTicket<Feed>),
    /// Type-ahead search.
    Search(SearchTicket),
    /// Detail record of a route.
    Detail(Route),
}

/// State for the feed browser TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    /// Feed tabs.
    pub tabs: Vec<Feed>,
    /// Index of the active tab.
    pub active_tab: usize,
    /// Paginated entries of the active tab.
    pub list: PagedList<Feed, MediaItem>,
    /// Scroll trigger for the list table.
    pub sensor: ScrollSensor,
    /// Search overlay controller.
    pub search: TypeaheadSearch<MediaItem>,
    /// Table state for the list (handles selection and scroll).
    pub table_state: TableState,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Detail pane content.
    pub detail: DetailPane,
    /// Visible list rows.
    viewport_rows: u32,
}

impl BrowserState {
    /// Creates a new state. `tabs` must not be empty.
    #[must_use]
    pub fn new(
        tabs: Vec<Feed>,
        active_tab: usize,
        page_ceiling: u32,
        scroll: ScrollConfig,
        search: TypeaheadSearch<MediaItem>,
    ) -> Self {
        let active_tab = active_tab.min(tabs.len().saturating_sub(1));
        let feed = tabs.get(active_tab).cloned().unwrap_or(Feed::People);
        Self {
            list: PagedList::new(feed).with_page_ceiling(page_ceiling),
            tabs,
            active_tab,
            sensor: ScrollSensor::new(scroll),
            search,
            table_state: TableState::default(),
            input_mode: InputMode::Normal,
            detail: DetailPane::Hidden,
            viewport_rows: 0,
        }
    }

    /// Attaches the scroll sensor and starts the active feed.
    pub fn mount(&mut self, now: Instant) -> Request {
        self.sensor.attach(now);
        let feed = self.list.filter_key().clone();
        Request::Page(self.list.reset(feed))
    }

    /// Switches to tab `index`, restarting its feed from page 1.
    ///
    /// Responses still in flight for the previous tab are discarded on arrival.
    pub fn switch_tab(&mut self, index: usize, now: Instant) -> Option<Request> {
        if index == self.active_tab {
            return None;
        }
        let feed = self.tabs.get(index)?.clone();
        self.active_tab = index;
        self.table_state = TableState::default();
        self.detail = DetailPane::Hidden;
        self.sensor.detach();
        self.sensor.attach(now);
        Some(Request::Page(self.list.reset(feed)))
    }

    /// Switches to the next tab, wrapping around.
    pub fn next_tab(&mut self, now: Instant) -> Option<Request> {
        let next = self.active_tab.saturating_add(1);
        self.switch_tab(if next < self.tabs.len() { next } else { 0 }, now)
    }

    /// Switches to the previous tab, wrapping around.
    pub fn previous_tab(&mut self, now: Instant) -> Option<Request> {
        let previous = self
            .active_tab
            .checked_sub(1)
            .unwrap_or_else(|| self.tabs.len().saturating_sub(1));
        self.switch_tab(previous, now)
    }

    /// Returns the list cursor position.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    /// Returns the highlighted list entry (if any).
    #[must_use]
    pub fn current_item(&self) -> Option<&MediaItem> {
        self.list.items().get(self.table_state.selected()?)
    }

    /// Scroll geometry in rows, derived from the cursor.
    #[must_use]
    pub fn metrics(&self) -> ScrollMetrics {
        let rows = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
        let scroll_height = rows(self.list.items().len());
        let below_cursor = self.cursor().saturating_add(1);
        ScrollMetrics {
            scroll_height,
            scroll_top: rows(below_cursor).saturating_sub(self.viewport_rows),
            client_height: self.viewport_rows,
        }
    }

    /// Records the visible row count after a draw.
    pub fn set_viewport(&mut self, rows: u32) {
        if rows != self.viewport_rows {
            self.viewport_rows = rows;
            self.sensor.observe(self.metrics());
        }
    }

    /// Whether the scroll-to-top hint should be shown.
    #[must_use]
    pub fn show_scroll_to_top(&self) -> bool {
        self.sensor
            .show_scroll_to_top(self.metrics(), self.list.items().len())
    }

    fn select(&mut self, index: usize, now: Instant) {
        if self.list.items().is_empty() {
            return;
        }
        let max = self.list.items().len().saturating_sub(1);
        self.table_state.select(Some(index.min(max)));
        self.sensor.on_scroll(self.metrics(), now);
    }

    /// Moves cursor up.
    pub fn move_up(&mut self, now: Instant) {
        self.select(self.cursor().saturating_sub(1), now);
    }

    /// Moves cursor down.
    pub fn move_down(&mut self, now: Instant) {
        self.select(self.cursor().saturating_add(1), now);
    }

    /// Scrolls up by a page.
    pub fn page_up(&mut self, page_size: usize, now: Instant) {
        self.select(self.cursor().saturating_sub(page_size), now);
    }

    /// Scrolls down by a page.
    pub fn page_down(&mut self, page_size: usize, now: Instant) {
        self.select(self.cursor().saturating_add(page_size), now);
    }

    /// Jumps back to the first entry.
    pub fn scroll_to_top(&mut self, now: Instant) {
        *self.table_state.offset_mut() = 0;
        self.select(0, now);
    }

    /// Collects fetches that became due at `now`.
    pub fn tick(&mut self, now: Instant) -> Vec<Request> {
        let mut requests = Vec::new();
        if self.sensor.poll(now, self.list.has_more())
            && let Some(ticket) = self.list.load_next()
        {
            requests.push(Request::Page(ticket));
        }
        if let Some(ticket) = self.search.poll(now) {
            requests.push(Request::Search(ticket));
        }
        requests
    }

    /// Applies a page resolution.
    ///
    /// The sensor is re-armed so a page that leaves the cursor near the
    /// bottom pulls the next one.
    pub fn apply_page(
        &mut self,
        ticket: &FetchTicket<Feed>,
        result: Result<PageResult<MediaItem>>,
        now: Instant,
    ) -> FetchOutcome {
        let outcome = self.list.complete(ticket, result);
        if matches!(outcome, FetchOutcome::Merged { .. }) {
            if self.table_state.selected().is_none() && !self.list.items().is_empty() {
                self.table_state.select(Some(0));
            }
            self.sensor.on_scroll(self.metrics(), now);
        }
        outcome
    }

    /// Enters search mode.
    pub const fn start_search(&mut self) {
        self.input_mode = InputMode::Search;
    }

    /// Appends a character to the search query.
    pub fn search_push(&mut self, ch: char, now: Instant) {
        let mut query = self.search.query().to_owned();
        query.push(ch);
        self.search.input(&query, now);
    }

    /// Removes the last character from the search query.
    pub fn search_pop(&mut self, now: Instant) {
        let mut query = self.search.query().to_owned();
        query.pop();
        self.search.input(&query, now);
    }

    /// Closes the search overlay.
    pub fn cancel_search(&mut self) {
        self.search.dismiss();
        self.input_mode = InputMode::Normal;
    }

    /// Opens the highlighted search result in the detail pane.
    pub fn choose_search_result(&mut self) -> Option<Request> {
        let item = self.search.select()?;
        self.input_mode = InputMode::Normal;
        Some(self.open_detail(item.route()))
    }

    /// Applies a search resolution.
    pub fn apply_search(&mut self, ticket: &SearchTicket, result: Result<Vec<MediaItem>>) -> bool {
        self.search.complete(ticket, result)
    }

    /// Opens the detail pane for `route`.
    pub fn open_detail(&mut self, route: Route) -> Request {
        self.detail = DetailPane::Loading(route);
        Request::Detail(route)
    }

    /// Opens the detail pane for the highlighted entry.
    pub fn open_current(&mut self) -> Option<Request> {
        let route = self.current_item()?.route();
        Some(self.open_detail(route))
    }

    /// Closes the detail pane.
    pub fn close_detail(&mut self) {
        self.detail = DetailPane::Hidden;
    }

    /// Applies a detail resolution. Ignored unless `route` is still pending.
    pub fn apply_detail(&mut self, route: Route, result: Result<MediaDetails>) -> bool {
        if !matches!(self.detail, DetailPane::Loading(pending) if pending == route) {
            return false;
        }
        self.detail = match result {
            Ok(details) => DetailPane::Loaded(Box::new(details)),
            Err(e) => {
                tracing::warn!(route = %route.path(), error = %format!("{e:#}"), "detail fetch failed");
                DetailPane::Failed(format!("{e:#}"))
            }
        };
        true
    }

    /// Route whose web page `o` should open: the detail pane, else the cursor.
    #[must_use]
    pub fn route_to_open(&self) -> Option<Route> {
        match &self.detail {
            DetailPane::Loading(route) => Some(*route),
            DetailPane::Loaded(details) => Some(details.route()),
            DetailPane::Hidden | DetailPane::Failed(_) => {
                self.current_item().map(MediaItem::route)
            }
        }
    }
}
