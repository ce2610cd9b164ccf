//! Feed browser TUI main loop.
//!
//! Rendering and key handling run on the current task; fetches are spawned
//! and report back over a channel, so the screen never blocks on the network.

/// Feed browser state types.
pub mod state;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use self::state::{BrowserState, InputMode, Request};
use crate::config::BrowseConfig;
use reelscout_api::tmdb::{Feed, MediaItem, Route, TmdbClient};
use reelscout_browse::{
    FetchTicket, MediaDetails, PageResult, PageSource, SearchSource, SearchTicket, TmdbCatalog,
    TypeaheadSearch,
};

/// Idle wait between frames when no key is pending.
const TICK: Duration = Duration::from_millis(30);

/// Rows taken by the list block's borders and header.
const LIST_CHROME_ROWS: u16 = 4;

/// Resolution of a spawned fetch.
enum Message {
    Page(FetchTicket<Feed>, Result<PageResult<MediaItem>>),
    Search(SearchTicket, Result<Vec<MediaItem>>),
    Detail(Route, Result<MediaDetails>),
}

type Catalog = Arc<TmdbCatalog<TmdbClient>>;

/// Runs the feed browser TUI.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
#[allow(clippy::module_name_repetitions)]
pub async fn run_browser(
    catalog: TmdbCatalog<TmdbClient>,
    tabs: Vec<Feed>,
    active_tab: usize,
    config: &BrowseConfig,
) -> Result<()> {
    let mut state = BrowserState::new(
        tabs,
        active_tab,
        config.list_page_ceiling(),
        config.scroll_config(),
        TypeaheadSearch::new(config.search_debounce()),
    );
    let catalog = Arc::new(catalog);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut state, &catalog).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Spawns the fetch for `request`; its result comes back on `tx`.
fn dispatch(request: Request, catalog: &Catalog, tx: &UnboundedSender<Message>) {
    let catalog = Arc::clone(catalog);
    let tx = tx.clone();
    match request {
        Request::Page(ticket) => {
            tokio::spawn(async move {
                let result = catalog.fetch_page(ticket.filter_key(), ticket.page()).await;
                let _ = tx.send(Message::Page(ticket, result));
            });
        }
        Request::Search(ticket) => {
            tokio::spawn(async move {
                let result = catalog.search(ticket.query()).await;
                let _ = tx.send(Message::Search(ticket, result));
            });
        }
        Request::Detail(route) => {
            tokio::spawn(async move {
                let result = catalog.details(route).await;
                let _ = tx.send(Message::Detail(route, result));
            });
        }
    }
}

/// Applies every resolution that has arrived.
fn drain_messages(state: &mut BrowserState, rx: &mut UnboundedReceiver<Message>) {
    while let Ok(message) = rx.try_recv() {
        match message {
            Message::Page(ticket, result) => {
                state.apply_page(&ticket, result, Instant::now());
            }
            Message::Search(ticket, result) => {
                state.apply_search(&ticket, result);
            }
            Message::Detail(route, result) => {
                state.apply_detail(route, result);
            }
        }
    }
}

/// Main event loop.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut BrowserState,
    catalog: &Catalog,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    dispatch(state.mount(Instant::now()), catalog, &tx);

    let mut list_height: u16 = 0;
    let mut requests = Vec::new();

    loop {
        terminal
            .draw(|frame| {
                list_height = ui::draw(frame, state);
            })
            .context("failed to draw TUI")?;

        let rows = list_height.saturating_sub(LIST_CHROME_ROWS);
        state.set_viewport(u32::from(rows));

        drain_messages(state, &mut rx);
        requests.extend(state.tick(Instant::now()));

        if event::poll(Duration::ZERO).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            if handle_key(state, key, usize::from(rows), &mut requests).await {
                return Ok(());
            }
        } else {
            tokio::time::sleep(TICK).await;
        }

        for request in requests.drain(..) {
            dispatch(request, catalog, &tx);
        }
    }
}

/// Handles one key press. Returns `true` to exit.
///
/// Yields first so spawned fetches still progress while a key repeats.
async fn handle_key(
    state: &mut BrowserState,
    key: KeyEvent,
    page_size: usize,
    requests: &mut Vec<Request>,
) -> bool {
    tokio::task::yield_now().await;
    match state.input_mode {
        InputMode::Search => {
            handle_search_input(state, key.code, requests);
            false
        }
        InputMode::Normal => {
            handle_normal_input(state, key.code, key.modifiers, page_size, requests)
        }
    }
}

/// Handles key input in search mode.
fn handle_search_input(state: &mut BrowserState, key: KeyCode, requests: &mut Vec<Request>) {
    let now = Instant::now();
    match key {
        KeyCode::Esc => state.cancel_search(),
        KeyCode::Enter => requests.extend(state.choose_search_result()),
        KeyCode::Down => state.search.select_next(),
        KeyCode::Up => state.search.select_previous(),
        KeyCode::Backspace => state.search_pop(now),
        KeyCode::Char(c) => state.search_push(c, now),
        _ => {}
    }
}

/// Handles key input in normal mode. Returns `true` to exit.
fn handle_normal_input(
    state: &mut BrowserState,
    key: KeyCode,
    modifiers: KeyModifiers,
    page_size: usize,
    requests: &mut Vec<Request>,
) -> bool {
    let now = Instant::now();
    match key {
        KeyCode::Char('q') => return true,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Up | KeyCode::Char('k') => state.move_up(now),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(now),
        KeyCode::PageUp => state.page_up(page_size, now),
        KeyCode::PageDown => state.page_down(page_size, now),
        KeyCode::Home | KeyCode::Char('g') => state.scroll_to_top(now),
        KeyCode::Tab | KeyCode::Right => requests.extend(state.next_tab(now)),
        KeyCode::BackTab | KeyCode::Left => requests.extend(state.previous_tab(now)),
        KeyCode::Enter => requests.extend(state.open_current()),
        KeyCode::Esc => state.close_detail(),
        KeyCode::Char('/') => state.start_search(),
        KeyCode::Char('o') => open_tmdb_page(state),
        _ => {}
    }
    false
}

/// Opens the TMDB web page of the detail pane or the highlighted entry.
fn open_tmdb_page(state: &BrowserState) {
    let Some(route) = state.route_to_open() else {
        return;
    };
    let url = route.web_url();
    if let Err(e) = open::that(&url) {
        tracing::warn!(url = %url, error = %e, "failed to open browser");
    }
}
