//! TUI rendering — header, toolbar, result line, body and status bar.

pub mod user_card;
pub mod user_table;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use roster_core::query::{QueryState, ViewMode};

use crate::app::{App, Mode};

pub const ERROR_NOTICE: &str = "Failed to load users. Please try again later.";
pub const EMPTY_NOTICE: &str = "No users found matching your criteria.";

/// Active-filter badges, e.g. `["Search: ervin", "Sort: A-Z"]`.
pub fn badges(query: &QueryState) -> Vec<String> {
  let mut out = Vec::new();
  if !query.search.is_empty() {
    out.push(format!("Search: {}", query.search));
  }
  if let Some(company) = &query.company {
    out.push(format!("Company: {company}"));
  }
  if let Some(badge) = query.sort.badge() {
    out.push(format!("Sort: {badge}"));
  }
  out
}

/// `"1 user found"` / `"N users found"`.
pub fn found_label(count: usize) -> String {
  if count == 1 {
    "1 user found".to_string()
  } else {
    format!("{count} users found")
  }
}

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let rows = Layout::vertical([
    Constraint::Length(1), // header
    Constraint::Length(3), // toolbar
    Constraint::Length(1), // result line
    Constraint::Min(0),    // body
    Constraint::Length(1), // status bar
  ])
  .split(f.area());

  draw_header(f, rows[0], app);
  draw_toolbar(f, rows[1], app);
  draw_results(f, rows[2], app);
  draw_body(f, rows[3], app);
  draw_status(f, rows[4], app);

  if app.mode == Mode::CompanyPicker {
    draw_company_picker(f, app);
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let left = Span::styled(
    " User Directory",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    match app.fetched_at {
      Some(at) => format!("fetched {} ", at.format("%H:%M:%S")),
      None => format!("{} ", Local::now().format("%Y-%m-%d")),
    },
    Style::default().fg(Color::Gray),
  );

  let pad = area
    .width
    .saturating_sub(clamp_u16(left.width()))
    .saturating_sub(clamp_u16(right.width()));

  let line = Line::from(vec![left, Span::raw(" ".repeat(usize::from(pad))), right]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::DarkGray)),
    area,
  );
}

// ─── Toolbar ──────────────────────────────────────────────────────────────────

fn draw_toolbar(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::horizontal([
    Constraint::Min(20),
    Constraint::Length(28),
    Constraint::Length(26),
    Constraint::Length(19),
  ])
  .split(area);

  let searching = app.mode == Mode::Search;
  let search_text = match (searching, app.query.search.is_empty()) {
    (true, _) => Line::from(format!("{}_", app.query.search)),
    (false, true) => Line::styled(
      "Search by name or email...",
      Style::default().fg(Color::DarkGray),
    ),
    (false, false) => Line::from(app.query.search.clone()),
  };
  f.render_widget(
    Paragraph::new(search_text).block(boxed(" / Search ", searching)),
    cols[0],
  );

  let company_text = match &app.query.company {
    Some(c) => Line::from(c.clone()),
    None => Line::styled("Filter by company", Style::default().fg(Color::DarkGray)),
  };
  f.render_widget(
    Paragraph::new(company_text).block(boxed(" c Company ", app.mode == Mode::CompanyPicker)),
    cols[1],
  );

  let sort_icon = match app.query.sort.badge() {
    Some(badge) => badge,
    None => "↕",
  };
  f.render_widget(
    Paragraph::new(Line::from(vec![
      Span::styled(format!("{sort_icon} "), Style::default().add_modifier(Modifier::BOLD)),
      Span::styled(app.query.sort.hint(), Style::default().fg(Color::DarkGray)),
    ]))
    .block(boxed(" s Sort ", false)),
    cols[2],
  );

  let tab = |mode: ViewMode| {
    let label = format!(" {} ", mode.label());
    if app.query.view == mode {
      Span::styled(label, Style::default().fg(Color::Black).bg(Color::Cyan))
    } else {
      Span::styled(label, Style::default().fg(Color::Cyan))
    }
  };
  f.render_widget(
    Paragraph::new(Line::from(vec![tab(ViewMode::Cards), Span::raw(" "), tab(ViewMode::Table)]))
      .block(boxed(" v View ", false)),
    cols[3],
  );
}

fn boxed(title: &str, focused: bool) -> Block<'_> {
  let color = if focused { Color::Yellow } else { Color::DarkGray };
  Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(color))
}

// ─── Result line ──────────────────────────────────────────────────────────────

fn draw_results(f: &mut Frame, area: Rect, app: &App) {
  let count = if app.is_loading() {
    "Loading...".to_string()
  } else {
    found_label(app.row_count())
  };

  let mut spans = vec![Span::styled(
    format!(" {count}"),
    Style::default().fg(Color::Gray),
  )];
  for badge in badges(&app.query) {
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
      format!(" {badge} "),
      Style::default().fg(Color::Cyan).bg(Color::Rgb(20, 40, 60)),
    ));
  }
  f.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  if app.has_error() {
    draw_error(f, area);
    return;
  }

  if app.is_loading() {
    match app.query.view {
      ViewMode::Cards => user_card::draw_skeleton(f, area),
      ViewMode::Table => user_table::draw_skeleton(f, area),
    }
    return;
  }

  let rows = app.rows();
  if rows.is_empty() {
    draw_empty(f, area);
    return;
  }

  match app.query.view {
    ViewMode::Cards => user_card::draw(f, area, &rows, app.scroll),
    ViewMode::Table => user_table::draw(f, area, &rows, app.scroll),
  }
}

fn draw_error(f: &mut Frame, area: Rect) {
  let block = Block::default()
    .title(" Error ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));
  let text = vec![
    Line::styled(ERROR_NOTICE, Style::default().fg(Color::Red)),
    Line::from(""),
    Line::styled("Press r to retry.", Style::default().fg(Color::DarkGray)),
  ];
  let [alert] = Layout::vertical([Constraint::Length(5)]).areas(area);
  f.render_widget(
    Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
    alert,
  );
}

fn draw_empty(f: &mut Frame, area: Rect) {
  let text = vec![
    Line::from(""),
    Line::styled(EMPTY_NOTICE, Style::default().fg(Color::Gray)),
    Line::styled(
      "Try adjusting your search or filter settings.",
      Style::default().fg(Color::DarkGray),
    ),
  ];
  f.render_widget(
    Paragraph::new(text).alignment(ratatui::layout::Alignment::Center),
    area,
  );
}

// ─── Company picker ───────────────────────────────────────────────────────────

/// Rows for `count` names plus the "All companies" entry and the border,
/// capped at `max`.
fn picker_height(count: usize, max: u16) -> u16 {
  clamp_u16(count).saturating_add(3).min(max)
}

fn clamp_u16(n: usize) -> u16 {
  u16::try_from(n).unwrap_or(u16::MAX)
}

fn draw_company_picker(f: &mut Frame, app: &App) {
  let height = picker_height(app.companies().len(), f.area().height);
  let [area] = Layout::horizontal([Constraint::Length(40)])
    .flex(Flex::Center)
    .areas(f.area());
  let [area] = Layout::vertical([Constraint::Length(height)])
    .flex(Flex::Center)
    .areas(area);

  let items: Vec<ListItem> = std::iter::once(ListItem::new(Line::styled(
    "All companies",
    Style::default().fg(Color::DarkGray),
  )))
  .chain(app.companies().iter().map(|c| ListItem::new(c.clone())))
  .collect();

  let mut state = ListState::default();
  state.select(Some(app.picker_cursor));

  f.render_widget(Clear, area);
  f.render_stateful_widget(
    List::new(items)
      .block(boxed(" Filter by company ", true))
      .highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      ),
    area,
    &mut state,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match app.mode {
    Mode::Search => ("SEARCH", "Type to filter  Enter done  Esc clear"),
    Mode::CompanyPicker => ("COMPANY", "↑↓/jk choose  Enter apply  Esc cancel"),
    Mode::Normal => (
      "NORMAL",
      "/ search  c company  x clear  s sort  v view  r refresh  ↑↓ scroll  q quit",
    ),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let line = Line::from(vec![
    Span::styled(
      format!(" {mode_label} "),
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::styled(format!("  {status}"), Style::default().fg(Color::DarkGray)),
  ]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
