//! Derived view — the rows a layout renders, computed from the fetched
//! collection and the current [`QueryState`].
//!
//! Everything here is a pure function of its inputs. [`Projection`] memoises
//! the last result so a redraw with unchanged inputs does no work, but the
//! output is always identical to calling [`DerivedView::compute`] directly.

use std::{cmp::Ordering, collections::BTreeSet, sync::Arc};

use feruca::Collator;

use crate::{
  query::{QueryState, SortOrder},
  user::User,
};

// ─── Company enumeration ─────────────────────────────────────────────────────

/// Distinct company names across the whole collection, ascending.
///
/// Always computed over the unfiltered collection, so applying a company
/// filter never shrinks the set of choices.
pub fn companies(users: &[User]) -> Vec<String> {
  users
    .iter()
    .map(|u| u.company.name.as_str())
    .collect::<BTreeSet<_>>()
    .into_iter()
    .map(str::to_owned)
    .collect()
}

// ─── Filter ──────────────────────────────────────────────────────────────────

/// Whether `user` passes the search text and company filter of `query`.
///
/// Search is a case-insensitive substring match over name or email. The
/// company filter is an exact match on `company.name`.
pub fn matches(user: &User, query: &QueryState) -> bool {
  passes(user, &query.search.to_lowercase(), query.company.as_deref())
}

/// `needle` must already be lowercased.
fn passes(user: &User, needle: &str, company: Option<&str>) -> bool {
  let search_ok = needle.is_empty()
    || user.name.to_lowercase().contains(needle)
    || user.email.to_lowercase().contains(needle);
  search_ok && company.is_none_or(|c| user.company.name == c)
}

// ─── Sort ────────────────────────────────────────────────────────────────────

/// Compare two display strings the way a person expects a name list sorted.
///
/// Uses the Unicode root collation order: accents and case only break ties
/// between otherwise equal letters, so "Émile" sorts among the E names and a
/// lowercase twin sorts before its capitalised form. Byte order breaks any
/// remaining tie so the comparison is total.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
  Collator::default().collate(a, b)
}

/// Indices into `users` of the rows that pass `query`, in display order.
fn row_indices(users: &[User], query: &QueryState) -> Vec<usize> {
  let needle = query.search.to_lowercase();
  let mut rows: Vec<usize> = users
    .iter()
    .enumerate()
    .filter(|(_, u)| passes(u, &needle, query.company.as_deref()))
    .map(|(i, _)| i)
    .collect();

  // `sort_by` is stable, so equal names keep their fetched order.
  let mut collator = Collator::default();
  match query.sort {
    SortOrder::Unset => {}
    SortOrder::Ascending => rows.sort_by(|&a, &b| {
      collator.collate(users[a].name.as_str(), users[b].name.as_str())
    }),
    SortOrder::Descending => rows.sort_by(|&a, &b| {
      collator.collate(users[b].name.as_str(), users[a].name.as_str())
    }),
  }
  rows
}

/// Filter `users` by `query` and order the survivors by its sort direction.
///
/// Always returns a fresh vector; the input slice is never reordered. With
/// [`SortOrder::Unset`] the output preserves the collection's relative order.
pub fn filter_and_sort<'a>(users: &'a [User], query: &QueryState) -> Vec<&'a User> {
  row_indices(users, query)
    .into_iter()
    .map(|i| &users[i])
    .collect()
}

// ─── DerivedView ─────────────────────────────────────────────────────────────

/// Rows to display plus the company choices for the filter control.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DerivedView<'a> {
  pub users:     Vec<&'a User>,
  pub companies: Vec<String>,
}

impl<'a> DerivedView<'a> {
  /// Compute the view. An absent collection (still loading, or failed)
  /// yields an empty view.
  pub fn compute(source: Option<&'a [User]>, query: &QueryState) -> Self {
    match source {
      Some(users) => Self {
        users:     filter_and_sort(users, query),
        companies: companies(users),
      },
      None => Self::default(),
    }
  }
}

// ─── Projection ──────────────────────────────────────────────────────────────

/// Memoised [`DerivedView`] over a shared collection.
///
/// Company names are recomputed only when the collection identity changes;
/// rows are recomputed when the collection or a filter/sort input changes.
/// Switching layout alone recomputes nothing.
#[derive(Debug, Default)]
pub struct Projection {
  source:    Option<Arc<Vec<User>>>,
  query:     Option<QueryState>,
  companies: Vec<String>,
  rows:      Vec<usize>,
}

impl Projection {
  pub fn new() -> Self {
    Self::default()
  }

  /// Bring the memo up to date. Returns `true` when the rows were recomputed.
  pub fn refresh(&mut self, source: Option<&Arc<Vec<User>>>, query: &QueryState) -> bool {
    let same_source = match (&self.source, source) {
      (Some(held), Some(next)) => Arc::ptr_eq(held, next),
      (None, None) => true,
      _ => false,
    };

    // Layout does not influence the rows.
    let key = query.clone().with_view(Default::default());
    if same_source && self.query.as_ref() == Some(&key) {
      return false;
    }

    if !same_source {
      self.source = source.cloned();
      self.companies = self
        .source
        .as_deref()
        .map(|users| companies(users))
        .unwrap_or_default();
    }
    self.rows = self
      .source
      .as_deref()
      .map(|users| row_indices(users, &key))
      .unwrap_or_default();
    self.query = Some(key);
    true
  }

  /// Distinct company names over the whole collection.
  pub fn companies(&self) -> &[String] {
    &self.companies
  }

  /// The derived rows in display order.
  pub fn users(&self) -> Vec<&User> {
    let all = self.source.as_deref().map(Vec::as_slice).unwrap_or_default();
    self.rows.iter().filter_map(|&i| all.get(i)).collect()
  }

  pub fn len(&self) -> usize {
    self.rows.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rows.is_empty()
  }
}

#[cfg(test)]
mod tests;
