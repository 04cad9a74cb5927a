//! View controller: query state, key dispatch and the memoised derived view.
//!
//! The app never touches the network. It consumes snapshots from the users
//! resource through [`App::sync`] and reports requests for a refetch back to
//! the event loop as [`KeyResult::Revalidate`].

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use roster_core::{
  query::{QueryState, ViewMode},
  user::User,
  view::Projection,
};
use roster_fetch::Snapshot;

// ─── Mode ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Normal,
  /// Typing into the search box; every keystroke refilters.
  Search,
  /// Choosing a company from the popup list.
  CompanyPicker,
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
  None,
  Revalidate,
  Quit,
}

// ─── App ──────────────────────────────────────────────────────────────────────

pub struct App {
  pub mode:          Mode,
  pub query:         QueryState,
  /// Latest state of the users resource.
  pub snapshot:      Snapshot<Vec<User>>,
  projection:        Projection,
  /// Highlighted entry in the company picker; 0 is "All companies".
  pub picker_cursor: usize,
  /// First visible row (table) or card row (cards).
  pub scroll:        usize,
  /// When the data currently shown arrived.
  pub fetched_at:    Option<DateTime<Local>>,
  pub status_msg:    String,
}

impl App {
  pub fn new(query: QueryState) -> Self {
    Self {
      mode: Mode::Normal,
      query,
      snapshot: Snapshot::default(),
      projection: Projection::new(),
      picker_cursor: 0,
      scroll: 0,
      fetched_at: None,
      status_msg: String::new(),
    }
  }

  // ── Data ──────────────────────────────────────────────────────────────────

  /// Take in a new resource snapshot.
  pub fn sync(&mut self, snapshot: Snapshot<Vec<User>>) {
    let new_data = match (&self.snapshot.data, &snapshot.data) {
      (Some(old), Some(new)) => !std::sync::Arc::ptr_eq(old, new),
      (None, Some(_)) => true,
      _ => false,
    };
    if new_data {
      self.fetched_at = Some(Local::now());
    }
    if !snapshot.is_validating {
      self.status_msg.clear();
    }
    self.snapshot = snapshot;
    self.refresh();
  }

  fn refresh(&mut self) {
    if self.projection.refresh(self.snapshot.data.as_ref(), &self.query) {
      self.scroll = 0;
    }
  }

  /// Derived rows in display order.
  pub fn rows(&self) -> Vec<&User> {
    self.projection.users()
  }

  pub fn row_count(&self) -> usize {
    self.projection.len()
  }

  /// Company choices over the whole collection.
  pub fn companies(&self) -> &[String] {
    self.projection.companies()
  }

  pub fn is_loading(&self) -> bool {
    self.snapshot.is_loading()
  }

  pub fn has_error(&self) -> bool {
    self.snapshot.error.is_some()
  }

  fn set_query(&mut self, query: QueryState) {
    self.query = query;
    self.refresh();
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return KeyResult::Quit;
    }

    match self.mode {
      Mode::Search => {
        self.handle_search_key(key);
        KeyResult::None
      }
      Mode::CompanyPicker => {
        self.handle_picker_key(key);
        KeyResult::None
      }
      Mode::Normal => self.handle_normal_key(key),
    }
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        let query = self.query.clone().with_search("");
        self.set_query(query);
      }
      KeyCode::Enter => self.mode = Mode::Normal,
      KeyCode::Backspace => {
        let mut search = self.query.search.clone();
        search.pop();
        let query = self.query.clone().with_search(search);
        self.set_query(query);
      }
      KeyCode::Char(c) => {
        let search = format!("{}{c}", self.query.search);
        let query = self.query.clone().with_search(search);
        self.set_query(query);
      }
      _ => {}
    }
  }

  fn handle_picker_key(&mut self, key: KeyEvent) {
    let choices = self.companies().len() + 1;
    match key.code {
      KeyCode::Esc => self.mode = Mode::Normal,
      KeyCode::Down | KeyCode::Char('j') => {
        if self.picker_cursor + 1 < choices {
          self.picker_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.picker_cursor = self.picker_cursor.saturating_sub(1);
      }
      KeyCode::Enter => {
        let company = self
          .picker_cursor
          .checked_sub(1)
          .and_then(|i| self.companies().get(i).cloned());
        self.mode = Mode::Normal;
        let query = self.query.clone().with_company(company);
        self.set_query(query);
      }
      _ => {}
    }
  }

  fn handle_normal_key(&mut self, key: KeyEvent) -> KeyResult {
    match key.code {
      KeyCode::Char('q') => return KeyResult::Quit,
      KeyCode::Char('r') => {
        self.status_msg = "Refreshing…".into();
        return KeyResult::Revalidate;
      }

      KeyCode::Char('/') => self.mode = Mode::Search,
      KeyCode::Char('c') => {
        self.picker_cursor = self
          .query
          .company
          .as_ref()
          .and_then(|c| self.companies().iter().position(|x| x == c))
          .map_or(0, |i| i + 1);
        self.mode = Mode::CompanyPicker;
      }
      KeyCode::Char('x') => {
        let query = self.query.clone().with_company(None);
        self.set_query(query);
      }
      KeyCode::Char('s') => {
        let query = self.query.clone().toggle_sort();
        self.set_query(query);
      }

      KeyCode::Char('v') => self.query.view = self.query.view.toggled(),
      KeyCode::Char('1') => self.query.view = ViewMode::Cards,
      KeyCode::Char('2') => self.query.view = ViewMode::Table,

      KeyCode::Down | KeyCode::Char('j') => {
        if self.scroll + 1 < self.row_count() {
          self.scroll += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
      KeyCode::Home | KeyCode::Char('g') => self.scroll = 0,

      _ => {}
    }
    KeyResult::None
  }
}
