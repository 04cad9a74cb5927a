//! Card layout — one bordered card per user in a responsive grid.

use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};
use roster_core::user::User;

/// Lines inside one card plus its two border rows.
pub const CARD_HEIGHT: u16 = 12;

/// Number of card columns that fit in `width`.
pub fn columns_for(width: u16) -> usize {
  match width {
    120.. => 3,
    80.. => 2,
    _ => 1,
  }
}

/// The content of a user's card.
pub fn card_lines(user: &User) -> Vec<Line<'static>> {
  let dim = Style::default().fg(Color::DarkGray);
  let label = Style::default().fg(Color::Cyan);

  let field = |name: &'static str, value: String| {
    Line::from(vec![Span::styled(format!("{name:<6}"), label), Span::raw(value)])
  };

  vec![
    Line::from(vec![
      Span::styled(
        user.name.clone(),
        Style::default().add_modifier(Modifier::BOLD),
      ),
      Span::raw("  "),
      Span::styled(format!("ID: {}", user.id), Style::default().fg(Color::Yellow)),
    ]),
    Line::from(Span::styled(user.handle(), dim)),
    field("mail", user.email.clone()),
    field("phone", user.phone.clone()),
    field("web", user.website.clone()),
    field("loc", user.address.summary()),
    Line::from(""),
    Line::from(Span::styled(
      "Company",
      Style::default().add_modifier(Modifier::BOLD),
    )),
    Line::from(user.company.name.clone()),
    Line::from(Span::styled(user.company.catch_phrase.clone(), dim)),
  ]
}

/// Render `users` as a grid whose first card row holds user `scroll`.
pub fn draw(f: &mut Frame, area: Rect, users: &[&User], scroll: usize) {
  let cols = columns_for(area.width);
  let visible_rows = usize::from(area.height / CARD_HEIGHT).max(1);

  let row_areas = Layout::vertical(vec![Constraint::Length(CARD_HEIGHT); visible_rows]).split(area);

  for (row_area, chunk) in row_areas
    .iter()
    .zip(users.chunks(cols).skip(scroll / cols.max(1)))
  {
    let cells = Layout::horizontal(vec![Constraint::Ratio(1, cols as u32); cols]).split(*row_area);
    for (cell, user) in cells.iter().zip(chunk) {
      let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
      let inner = block.inner(*cell);
      f.render_widget(block, *cell);
      f.render_widget(Paragraph::new(card_lines(user)), inner);
    }
  }
}

/// Placeholder cards shown while the first fetch is outstanding.
pub fn draw_skeleton(f: &mut Frame, area: Rect) {
  let cols = columns_for(area.width);
  let rows = 6_usize.div_ceil(cols);
  let row_areas = Layout::vertical(vec![Constraint::Length(CARD_HEIGHT / 2); rows]).split(area);
  let bar = Style::default().fg(Color::DarkGray);

  for (r, row_area) in row_areas.iter().enumerate() {
    let cells = Layout::horizontal(vec![Constraint::Ratio(1, cols as u32); cols]).split(*row_area);
    for (c, cell) in cells.iter().enumerate() {
      if r * cols + c >= 6 {
        break;
      }
      let block = Block::default().borders(Borders::ALL).border_style(bar);
      let inner = block.inner(*cell);
      f.render_widget(block, *cell);
      let width = usize::from(inner.width);
      let lines: Vec<Line> = [70, 90, 60, 80]
        .iter()
        .map(|pct| Line::from(Span::styled("░".repeat(width * pct / 100), bar)))
        .collect();
      f.render_widget(Paragraph::new(lines), inner);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn column_breakpoints() {
    assert_eq!(columns_for(60), 1);
    assert_eq!(columns_for(80), 2);
    assert_eq!(columns_for(119), 2);
    assert_eq!(columns_for(200), 3);
  }
}
