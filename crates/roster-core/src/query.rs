//! Query state — what the person browsing the directory currently asked for.
//!
//! The state is a plain value. Every transition returns a new value, so the
//! view layer can compare the previous and next state to decide whether the
//! derived rows need recomputing.

use serde::{Deserialize, Serialize};

// ─── Sort ────────────────────────────────────────────────────────────────────

/// Sort direction over the user's display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
  /// Keep the collection's original order.
  #[default]
  Unset,
  #[serde(alias = "asc")]
  Ascending,
  #[serde(alias = "desc")]
  Descending,
}

impl SortOrder {
  /// Next state of the sort toggle: unset → ascending → descending → unset.
  pub fn toggled(self) -> Self {
    match self {
      Self::Unset => Self::Ascending,
      Self::Ascending => Self::Descending,
      Self::Descending => Self::Unset,
    }
  }

  /// Badge text for an active sort, `None` when unset.
  pub fn badge(self) -> Option<&'static str> {
    match self {
      Self::Unset => None,
      Self::Ascending => Some("A-Z"),
      Self::Descending => Some("Z-A"),
    }
  }

  /// Describes what the next toggle will do.
  pub fn hint(self) -> &'static str {
    match self {
      Self::Unset => "Sort by name ascending",
      Self::Ascending => "Sort by name descending",
      Self::Descending => "Sort by name clear sort",
    }
  }
}

// ─── Layout ──────────────────────────────────────────────────────────────────

/// Which of the two layouts renders the derived rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
  #[default]
  Cards,
  Table,
}

impl ViewMode {
  pub fn toggled(self) -> Self {
    match self {
      Self::Cards => Self::Table,
      Self::Table => Self::Cards,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Cards => "Cards",
      Self::Table => "Table",
    }
  }
}

// ─── QueryState ──────────────────────────────────────────────────────────────

/// Current search text, company filter, sort direction and layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QueryState {
  /// Free-text filter over name and email; empty matches everything.
  pub search:  String,
  /// Exact company name to keep, or `None` for all companies.
  pub company: Option<String>,
  pub sort:    SortOrder,
  pub view:    ViewMode,
}

impl QueryState {
  pub fn with_search(self, search: impl Into<String>) -> Self {
    Self {
      search: search.into(),
      ..self
    }
  }

  pub fn with_company(self, company: Option<String>) -> Self {
    Self { company, ..self }
  }

  pub fn with_sort(self, sort: SortOrder) -> Self {
    Self { sort, ..self }
  }

  pub fn with_view(self, view: ViewMode) -> Self {
    Self { view, ..self }
  }

  pub fn toggle_sort(self) -> Self {
    let sort = self.sort.toggled();
    Self { sort, ..self }
  }

  /// True when search, company filter and sort are all at their defaults.
  pub fn is_unfiltered(&self) -> bool {
    self.search.is_empty() && self.company.is_none() && self.sort == SortOrder::Unset
  }
}
