//! Non-interactive output: fetch once, print the derived view, exit.

use anyhow::{Result, anyhow};
use ratatui::text::Line;
use roster_core::{
  query::{QueryState, ViewMode},
  user::User,
  view::DerivedView,
};
use roster_fetch::users::UsersCache;
use tracing::info;

use crate::ui::{self, EMPTY_NOTICE, ERROR_NOTICE, user_card, user_table};

/// Fetch `url` through `cache` and print the view for `query` to stdout.
pub async fn run(cache: &UsersCache, url: &str, query: &QueryState) -> Result<()> {
  match cache.get(&url.to_string()).await {
    Ok(users) => {
      let view = DerivedView::compute(Some(users.as_slice()), query);
      info!(total = users.len(), shown = view.users.len(), "rendering plain view");
      print!("{}", render(&view.users, query));
      Ok(())
    }
    Err(e) => {
      eprintln!("{ERROR_NOTICE}");
      Err(anyhow!(e).context(format!("GET {url}")))
    }
  }
}

/// Summary line followed by the rows in the chosen layout.
pub fn render(users: &[&User], query: &QueryState) -> String {
  let mut out = ui::found_label(users.len());
  for badge in ui::badges(query) {
    out.push_str(&format!("  [{badge}]"));
  }
  out.push_str("\n\n");

  if users.is_empty() {
    out.push_str(EMPTY_NOTICE);
    out.push('\n');
    return out;
  }

  match query.view {
    ViewMode::Cards => out.push_str(&render_cards(users)),
    ViewMode::Table => out.push_str(&render_table(users)),
  }
  out
}

fn line_text(line: &Line) -> String {
  line.spans.iter().map(|s| s.content.as_ref()).collect()
}

fn render_cards(users: &[&User]) -> String {
  users
    .iter()
    .map(|user| {
      user_card::card_lines(user)
        .iter()
        .map(|line| line_text(line).trim_end().to_string() + "\n")
        .collect::<String>()
    })
    .collect::<Vec<_>>()
    .join("\n")
}

fn render_table(users: &[&User]) -> String {
  let rows: Vec<[String; 6]> = users.iter().map(|u| user_table::row_cells(u)).collect();

  let mut widths = user_table::HEADERS.map(|h| h.chars().count());
  for row in &rows {
    for (width, cell) in widths.iter_mut().zip(row) {
      *width = (*width).max(cell.chars().count());
    }
  }

  let format_row = |cells: [&str; 6]| {
    let padded: Vec<String> = cells
      .iter()
      .zip(widths)
      .map(|(cell, width)| format!("{cell:<width$}"))
      .collect();
    padded.join("  ").trim_end().to_string() + "\n"
  };

  let mut out = format_row(user_table::HEADERS);
  out.push_str(&format_row(widths.map(|w| "-".repeat(w)).each_ref().map(String::as_str)));
  for row in &rows {
    out.push_str(&format_row(row.each_ref().map(String::as_str)));
  }
  out
}

#[cfg(test)]
mod tests {
  use roster_core::{
    query::SortOrder,
    user::{Address, Company, Geo},
  };

  use super::*;

  fn user(id: u64, name: &str, email: &str, company: &str) -> User {
    User {
      id,
      name: name.into(),
      username: format!("user{id}"),
      email: email.into(),
      address: Address {
        street:  "Douglas Extension".into(),
        suite:   "Suite 847".into(),
        city:    "McKenziehaven".into(),
        zipcode: "59590-4157".into(),
        geo:     Geo {
          lat: "-68.6102".into(),
          lng: "-47.0653".into(),
        },
      },
      phone: "1-463-123-4447".into(),
      website: "ramiro.info".into(),
      company: Company {
        name:         company.into(),
        catch_phrase: "Face to face bifurcated interface".into(),
        bs:           "e-enable strategic applications".into(),
      },
    }
  }

  fn directory() -> Vec<User> {
    vec![
      user(1, "Leanne Graham", "Sincere@april.biz", "Romaguera-Crona"),
      user(2, "Ervin Howell", "Shanna@melissa.tv", "Deckow-Crist"),
    ]
  }

  #[test]
  fn table_is_aligned() {
    let users = directory();
    let query = QueryState::default()
      .with_sort(SortOrder::Ascending)
      .with_view(ViewMode::Table);
    let view = DerivedView::compute(Some(&users), &query);
    let text = render(&view.users, &query);

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "2 users found  [Sort: A-Z]");
    assert!(lines[2].starts_with("Name"));
    assert!(lines[3].starts_with("----"));
    assert!(lines[4].starts_with("Ervin Howell (@user2)"));
    assert!(lines[5].starts_with("Leanne Graham (@user1)"));

    let email_col = lines[2].find("Email").unwrap();
    assert_eq!(lines[4].find("Shanna@melissa.tv"), Some(email_col));
    assert_eq!(lines[5].find("Sincere@april.biz"), Some(email_col));
  }

  #[test]
  fn cards_list_every_field() {
    let users = directory();
    let query = QueryState::default().with_search("leanne");
    let view = DerivedView::compute(Some(&users), &query);
    let text = render(&view.users, &query);

    assert!(text.starts_with("1 user found  [Search: leanne]"));
    for needle in [
      "Leanne Graham  ID: 1",
      "@user1",
      "Sincere@april.biz",
      "1-463-123-4447",
      "ramiro.info",
      "McKenziehaven, 59590-4157",
      "Romaguera-Crona",
      "Face to face bifurcated interface",
    ] {
      assert!(text.contains(needle), "missing {needle:?}");
    }
    assert!(!text.contains("Ervin"));
  }

  #[test]
  fn empty_view_prints_notice() {
    let users = directory();
    let query = QueryState::default().with_company(Some("Nobody Inc".into()));
    let view = DerivedView::compute(Some(&users), &query);
    let text = render(&view.users, &query);
    assert!(text.contains(EMPTY_NOTICE));
    assert!(text.contains("[Company: Nobody Inc]"));
  }
}
