//! Table layout — one row per user.

use ratatui::{
  Frame,
  layout::{Constraint, Rect},
  style::{Color, Modifier, Style},
  text::Line,
  widgets::{Block, Borders, Cell, Row, Table},
};
use roster_core::user::User;

pub const HEADERS: [&str; 6] = ["Name", "Email", "Phone", "Company", "Location", "Website"];

const WIDTHS: [Constraint; 6] = [
  Constraint::Percentage(20),
  Constraint::Percentage(20),
  Constraint::Percentage(17),
  Constraint::Percentage(15),
  Constraint::Percentage(15),
  Constraint::Percentage(13),
];

/// Column values for one user, in [`HEADERS`] order.
pub fn row_cells(user: &User) -> [String; 6] {
  [
    format!("{} ({})", user.name, user.handle()),
    user.email.clone(),
    user.phone.clone(),
    user.company.name.clone(),
    user.address.summary(),
    user.website.clone(),
  ]
}

fn header() -> Row<'static> {
  Row::new(HEADERS.map(Cell::from)).style(
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  )
}

fn frame() -> Block<'static> {
  Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray))
}

/// Render `users` starting at row `scroll`, striping alternate rows.
pub fn draw(f: &mut Frame, area: Rect, users: &[&User], scroll: usize) {
  let rows = users.iter().enumerate().skip(scroll).map(|(i, user)| {
    let style = if i % 2 == 1 {
      Style::default().bg(Color::Rgb(30, 30, 30))
    } else {
      Style::default()
    };
    Row::new(row_cells(user).map(Cell::from)).style(style)
  });

  f.render_widget(Table::new(rows, WIDTHS).header(header()).block(frame()), area);
}

/// Placeholder rows shown while the first fetch is outstanding.
pub fn draw_skeleton(f: &mut Frame, area: Rect) {
  let bar = Style::default().fg(Color::DarkGray);
  let rows = (0..8).map(|_| {
    Row::new([25, 30, 20, 15, 15, 10].map(|n: usize| Cell::from(Line::styled("░".repeat(n / 2), bar))))
  });
  f.render_widget(Table::new(rows, WIDTHS).header(header()).block(frame()), area);
}
