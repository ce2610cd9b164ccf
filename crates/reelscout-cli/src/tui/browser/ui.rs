//! TUI rendering logic for the feed browser.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Clear, List, ListItem, ListState, Paragraph, Row, Table, Tabs, Wrap,
};
use reelscout_api::tmdb::{MediaItem, TmdbCredits};
use reelscout_browse::{ListStatus, MediaDetails};

use super::state::{BrowserState, DetailPane, InputMode};

/// Cast entries listed in the detail pane.
const DETAIL_CAST: usize = 8;

fn dash(value: Option<&str>) -> String {
    value.map_or_else(|| String::from("-"), String::from)
}

fn header_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Draws the browser UI. Returns the list area height for page size calculation.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &mut BrowserState) -> u16 {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // tabs
            Constraint::Min(5),    // list (+ detail)
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_tabs(frame, chunks[0], state);

    let list_area = if matches!(state.detail, DetailPane::Hidden) {
        chunks[1]
    } else {
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[1]);
        draw_detail(frame, panes[1], state);
        panes[0]
    };
    draw_list(frame, list_area, state);

    draw_footer(frame, chunks[2], state);

    if state.input_mode == InputMode::Search || state.search.is_open() {
        draw_search(frame, frame.area(), state);
    }

    list_area.height
}

/// Draws the feed tabs.
fn draw_tabs(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let titles: Vec<String> = state.tabs.iter().map(|f| f.label()).collect();
    let tabs = Tabs::new(titles)
        .select(state.active_tab)
        .block(Block::default().borders(Borders::ALL).title(" reelscout "))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn item_row(item: &MediaItem) -> Row<'static> {
    Row::new(vec![
        String::from(item.media_type.label()),
        item.year()
            .map_or_else(|| String::from("--"), |y| y.to_string()),
        item.title.clone(),
        item.vote_average
            .map_or_else(|| String::from("--"), |v| format!("{v:.1}")),
    ])
}

/// Draws the paginated list.
fn draw_list(frame: &mut Frame, area: Rect, state: &mut BrowserState) {
    let header = Row::new(vec!["Type", "Year", "Title", "Rating"])
        .style(header_style())
        .bottom_margin(1);

    let rows: Vec<Row> = state.list.items().iter().map(item_row).collect();

    let widths = [
        Constraint::Length(7),
        Constraint::Length(6),
        Constraint::Min(20),
        Constraint::Length(6),
    ];

    let border_style = if state.input_mode == InputMode::Normal {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", state.list.filter_key().label()))
                .border_style(border_style),
        )
        .row_highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, &mut state.table_state);
}

fn credit_lines(credits: &TmdbCredits) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if !credits.cast.is_empty() {
        lines.push(Line::from(Span::styled("Cast", header_style())));
    }
    for cast in credits.cast.iter().take(DETAIL_CAST) {
        lines.push(Line::from(format!(
            "  {} - {}",
            dash(cast.name.as_deref().or(cast.title.as_deref())),
            dash(cast.character.as_deref()),
        )));
    }
    for crew in credits
        .crew
        .iter()
        .filter(|c| matches!(c.job.as_deref(), Some("Director" | "Creator")))
    {
        lines.push(Line::from(format!(
            "{}: {}",
            dash(crew.job.as_deref()),
            dash(crew.name.as_deref().or(crew.title.as_deref())),
        )));
    }
    lines
}

fn detail_lines(details: &MediaDetails) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        String::from(details.title()),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    let overview = match details {
        MediaDetails::Movie { details, .. } => {
            lines.push(Line::from(format!(
                "{}  {}min  {:.1}/10",
                dash(details.release_date.as_deref()),
                details
                    .runtime
                    .map_or_else(|| String::from("-"), |r| r.to_string()),
                details.vote_average,
            )));
            if let Some(tagline) = details.tagline.as_deref().filter(|t| !t.is_empty()) {
                lines.push(Line::from(Span::styled(
                    String::from(tagline),
                    Style::default().add_modifier(Modifier::ITALIC),
                )));
            }
            details.overview.clone()
        }
        MediaDetails::TvShow { details, .. } => {
            lines.push(Line::from(format!(
                "{}  {} seasons  {} episodes  {}",
                dash(details.first_air_date.as_deref()),
                details.number_of_seasons,
                details.number_of_episodes,
                dash(details.status.as_deref()),
            )));
            details.overview.clone()
        }
        MediaDetails::Person { details, .. } => {
            lines.push(Line::from(format!(
                "{}  born {}  {}",
                dash(details.known_for_department.as_deref()),
                dash(details.birthday.as_deref()),
                dash(details.place_of_birth.as_deref()),
            )));
            details.biography.clone()
        }
    };
    lines.push(Line::from(""));
    if let Some(text) = overview.filter(|t| !t.is_empty()) {
        lines.push(Line::from(text));
        lines.push(Line::from(""));
    }
    lines.extend(credit_lines(details.credits()));
    lines
}

/// Draws the detail pane (right).
fn draw_detail(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let lines = match &state.detail {
        DetailPane::Hidden => return,
        DetailPane::Loading(route) => vec![Line::from(format!("Loading {}...", route.path()))],
        DetailPane::Loaded(details) => detail_lines(details),
        DetailPane::Failed(message) => vec![Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        ))],
    };
    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Details "));
    frame.render_widget(detail, area);
}

/// Draws the footer with list status and key hints.
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let list = state.list.state();
    let status_style = match list.status {
        ListStatus::Failed => Style::default().fg(Color::Red),
        ListStatus::Loading => Style::default().fg(Color::Yellow),
        ListStatus::Idle | ListStatus::Exhausted | ListStatus::NothingFound => Style::default(),
    };
    let status = list.error.as_ref().map_or_else(
        || list.status.to_string(),
        |e| format!("{}: {e}", list.status),
    );

    let mut hints = String::from("q:quit  Tab:feed  j/k:move  Enter:details  /:search  o:open");
    if state.show_scroll_to_top() {
        hints.push_str("  g:top");
    }

    let line = Line::from(vec![
        Span::raw(format!("{} items  page {}  ", list.items.len(), list.page)),
        Span::styled(status, status_style),
        Span::raw("  |  "),
        Span::raw(hints),
    ]);
    let footer = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Centers a rect of the given percentages inside `area`.
#[allow(clippy::indexing_slicing)]
fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Percentage(percent_y),
            Constraint::Fill(1),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Percentage(percent_x),
            Constraint::Fill(1),
        ])
        .split(vertical[1])[1]
}

/// Draws the search overlay with input and results.
#[allow(clippy::indexing_slicing)]
fn draw_search(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let popup = centered(area, 70, 60);
    frame.render_widget(Clear, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(popup);

    let input_style = if state.input_mode == InputMode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input = Paragraph::new(state.search.query())
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title(" Search "));
    frame.render_widget(input, chunks[0]);

    let block = Block::default().borders(Borders::ALL).title(" Results ");
    let Some(results) = state.search.results() else {
        let hint = if state.search.is_searching() {
            "Searching..."
        } else {
            "Type to search movies, TV shows and people"
        };
        frame.render_widget(Paragraph::new(hint).block(block), chunks[1]);
        return;
    };
    if results.is_empty() {
        frame.render_widget(Paragraph::new("No results").block(block), chunks[1]);
        return;
    }

    let items: Vec<ListItem> = results
        .iter()
        .map(|item| {
            ListItem::new(format!(
                "[{}] {} ({})",
                item.media_type.label(),
                item.title,
                item.year()
                    .map_or_else(|| String::from("--"), |y| y.to_string()),
            ))
        })
        .collect();
    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    let mut list_state = ListState::default().with_selected(state.search.selected_index());
    frame.render_stateful_widget(list, chunks[1], &mut list_state);
}
