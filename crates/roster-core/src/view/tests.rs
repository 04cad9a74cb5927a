//! Tests for the derived view: filter predicate, company enumeration, sort
//! and the memoised projection.

use std::{cmp::Ordering, sync::Arc};

use super::*;
use crate::{
  query::{QueryState, SortOrder, ViewMode},
  user::{Address, Company, Geo, User},
};

fn user(id: u64, name: &str, email: &str, company: &str) -> User {
  User {
    id,
    name: name.into(),
    username: name.split(' ').next().unwrap_or_default().into(),
    email: email.into(),
    address: Address {
      street:  "Kulas Light".into(),
      suite:   "Apt. 556".into(),
      city:    "Gwenborough".into(),
      zipcode: "92998-3874".into(),
      geo:     Geo {
        lat: "-37.3159".into(),
        lng: "81.1496".into(),
      },
    },
    phone: "1-770-736-8031".into(),
    website: "hildegard.org".into(),
    company: Company {
      name:         company.into(),
      catch_phrase: "Multi-layered client-server neural-net".into(),
      bs:           "harness real-time e-markets".into(),
    },
  }
}

fn pair() -> Vec<User> {
  vec![
    user(1, "Leanne Graham", "Sincere@april.biz", "Romaguera-Crona"),
    user(2, "Ervin Howell", "Shanna@melissa.tv", "Deckow-Crist"),
  ]
}

fn directory() -> Vec<User> {
  vec![
    user(1, "Leanne Graham", "Sincere@april.biz", "Romaguera-Crona"),
    user(2, "Ervin Howell", "Shanna@melissa.tv", "Deckow-Crist"),
    user(3, "Clementine Bauch", "Nathan@yesenia.net", "Romaguera-Jacobson"),
    user(4, "Patricia Lebsack", "Julianne.OConner@kory.org", "Robel-Corkery"),
    user(5, "Chelsey Dietrich", "Lucio_Hettinger@annie.ca", "Keebler LLC"),
    user(6, "Mrs. Dennis Schulist", "Karley_Dach@jasper.info", "Considine-Lockman"),
    user(7, "Kurtis Weissnat", "Telly.Hoeger@billy.biz", "Johns Group"),
    user(8, "Nicholas Runolfsdottir V", "Sherwood@rosamond.me", "Abernathy Group"),
    user(9, "Glenna Reichert", "Chaim_McDermott@dana.io", "Yost and Sons"),
    user(10, "Clementina DuBuque", "Rey.Padberg@karina.biz", "Hoeger LLC"),
    user(11, "leanne graham", "second@april.biz", "Romaguera-Crona"),
  ]
}

fn names(users: &[&User]) -> Vec<String> {
  users.iter().map(|u| u.name.clone()).collect()
}

// ─── Scenario ────────────────────────────────────────────────────────────────

#[test]
fn search_by_name_is_case_insensitive() {
  let users = pair();
  let q = QueryState::default().with_search("ervin");
  assert_eq!(names(&filter_and_sort(&users, &q)), ["Ervin Howell"]);
}

#[test]
fn company_filter_matches_exactly() {
  let users = pair();
  let q = QueryState::default().with_company(Some("Romaguera-Crona".into()));
  assert_eq!(names(&filter_and_sort(&users, &q)), ["Leanne Graham"]);

  // A prefix of a company name is not a match.
  let q = QueryState::default().with_company(Some("Romaguera".into()));
  assert!(filter_and_sort(&users, &q).is_empty());
}

#[test]
fn ascending_sort_without_filters() {
  let users = pair();
  let q = QueryState::default().with_sort(SortOrder::Ascending);
  assert_eq!(
    names(&filter_and_sort(&users, &q)),
    ["Ervin Howell", "Leanne Graham"]
  );
}

// ─── Filter ──────────────────────────────────────────────────────────────────

#[test]
fn search_covers_email_too() {
  let users = directory();
  let q = QueryState::default().with_search("MELISSA.TV");
  assert_eq!(names(&filter_and_sort(&users, &q)), ["Ervin Howell"]);
}

#[test]
fn search_partitions_collection() {
  let users = directory();
  for needle in ["an", "BIZ", "ll", "x", "", "clementin"] {
    let q = QueryState::default().with_search(needle);
    let kept = filter_and_sort(&users, &q);
    let lower = needle.to_lowercase();
    for u in &users {
      let hit = u.name.to_lowercase().contains(&lower)
        || u.email.to_lowercase().contains(&lower);
      let included = kept.iter().any(|k| std::ptr::eq(*k, u));
      assert_eq!(hit, included, "needle {needle:?}, user {}", u.name);
      assert_eq!(hit, matches(u, &q));
    }
  }
}

#[test]
fn search_and_company_combine() {
  let users = directory();
  let q = QueryState::default()
    .with_search("leanne")
    .with_company(Some("Romaguera-Crona".into()));
  let kept = filter_and_sort(&users, &q);
  assert_eq!(kept.len(), 2);
  assert!(kept.iter().all(|u| u.company.name == "Romaguera-Crona"));

  let q = q.with_search("ervin");
  assert!(filter_and_sort(&users, &q).is_empty());
}

// ─── Companies ───────────────────────────────────────────────────────────────

#[test]
fn companies_are_distinct_and_sorted() {
  let users = directory();
  let list = companies(&users);
  let mut expected: Vec<String> = users.iter().map(|u| u.company.name.clone()).collect();
  expected.sort();
  expected.dedup();
  assert_eq!(list, expected);
  assert_eq!(list.first().map(String::as_str), Some("Abernathy Group"));
}

#[test]
fn companies_ignore_query_state() {
  let users = directory();
  let all = DerivedView::compute(Some(&users), &QueryState::default());
  let filtered = DerivedView::compute(
    Some(&users),
    &QueryState::default()
      .with_search("ervin")
      .with_company(Some("Deckow-Crist".into()))
      .with_sort(SortOrder::Descending),
  );
  assert_eq!(filtered.users.len(), 1);
  assert_eq!(all.companies, filtered.companies);
}

#[test]
fn absent_collection_yields_empty_view() {
  let view = DerivedView::compute(None, &QueryState::default().with_search("x"));
  assert!(view.users.is_empty());
  assert!(view.companies.is_empty());
  assert!(companies(&[]).is_empty());
}

// ─── Sort ────────────────────────────────────────────────────────────────────

#[test]
fn unset_sort_preserves_filter_order_and_identity() {
  let users = directory();
  let q = QueryState::default().with_search("a");
  let kept = filter_and_sort(&users, &q);
  let filter_only: Vec<&User> = users.iter().filter(|u| matches(u, &q)).collect();

  assert_eq!(kept.len(), filter_only.len());
  for (a, b) in kept.iter().zip(&filter_only) {
    assert!(std::ptr::eq(*a, *b));
  }
}

#[test]
fn sorting_never_reorders_the_source() {
  let users = directory();
  let before: Vec<u64> = users.iter().map(|u| u.id).collect();
  let _ = filter_and_sort(&users, &QueryState::default().with_sort(SortOrder::Descending));
  let after: Vec<u64> = users.iter().map(|u| u.id).collect();
  assert_eq!(before, after);
}

#[test]
fn descending_is_reverse_of_ascending_for_distinct_names() {
  let users: Vec<User> = directory().into_iter().filter(|u| u.id != 11).collect();
  let asc = filter_and_sort(&users, &QueryState::default().with_sort(SortOrder::Ascending));
  let mut desc = filter_and_sort(&users, &QueryState::default().with_sort(SortOrder::Descending));
  desc.reverse();
  assert_eq!(names(&asc), names(&desc));
  assert_eq!(asc.first().map(|u| u.name.as_str()), Some("Chelsey Dietrich"));
}

#[test]
fn locale_cmp_folds_case_first() {
  assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
  assert_eq!(locale_cmp("Zed", "alpha"), Ordering::Greater);
  assert_eq!(locale_cmp("leanne", "Leanne"), Ordering::Less);
  assert_eq!(locale_cmp("Leanne", "Leanne"), Ordering::Equal);
  assert_eq!(locale_cmp("Ann", "Anna"), Ordering::Less);
}

#[test]
fn accented_initials_sort_with_their_base_letter() {
  let users = vec![
    user(1, "Zoe Adams", "zoe@adams.io", "Acme"),
    user(2, "Émile Zola", "emile@zola.fr", "Acme"),
    user(3, "Fred Smith", "fred@smith.io", "Acme"),
    user(4, "Eve Moreau", "eve@moreau.fr", "Acme"),
  ];
  let asc = filter_and_sort(&users, &QueryState::default().with_sort(SortOrder::Ascending));
  assert_eq!(names(&asc), ["Émile Zola", "Eve Moreau", "Fred Smith", "Zoe Adams"]);

  let desc = filter_and_sort(&users, &QueryState::default().with_sort(SortOrder::Descending));
  assert_eq!(names(&desc), ["Zoe Adams", "Fred Smith", "Eve Moreau", "Émile Zola"]);
}

#[test]
fn locale_cmp_treats_accents_as_secondary() {
  assert_eq!(locale_cmp("Émile", "Fred"), Ordering::Less);
  assert_eq!(locale_cmp("Émile", "Emile"), Ordering::Greater);
  assert_eq!(locale_cmp("Peña", "Peng"), Ordering::Less);
}

#[test]
fn ascending_sort_places_lowercase_twin_first() {
  let users = directory();
  let sorted = filter_and_sort(
    &users,
    &QueryState::default()
      .with_search("leanne")
      .with_sort(SortOrder::Ascending),
  );
  assert_eq!(names(&sorted), ["leanne graham", "Leanne Graham"]);
}

// ─── Projection ──────────────────────────────────────────────────────────────

#[test]
fn projection_matches_direct_computation() {
  let users = Arc::new(directory());
  let q = QueryState::default()
    .with_search("an")
    .with_sort(SortOrder::Ascending);

  let mut memo = Projection::new();
  assert!(memo.refresh(Some(&users), &q));

  let direct = DerivedView::compute(Some(&users), &q);
  assert_eq!(memo.users(), direct.users);
  assert_eq!(memo.companies(), direct.companies.as_slice());
  assert_eq!(memo.len(), direct.users.len());
}

#[test]
fn projection_skips_unchanged_inputs() {
  let users = Arc::new(directory());
  let q = QueryState::default();
  let mut memo = Projection::new();

  assert!(memo.refresh(Some(&users), &q));
  assert!(!memo.refresh(Some(&users), &q));
  // Layout alone does not invalidate the rows.
  assert!(!memo.refresh(Some(&users), &q.clone().with_view(ViewMode::Table)));
  assert!(memo.refresh(Some(&users), &q.clone().toggle_sort()));

  // A new collection with equal contents is still a new identity.
  let refetched = Arc::new(directory());
  assert!(memo.refresh(Some(&refetched), &q.toggle_sort()));
}

#[test]
fn projection_empties_when_source_disappears() {
  let users = Arc::new(directory());
  let q = QueryState::default();
  let mut memo = Projection::new();
  memo.refresh(Some(&users), &q);
  assert!(!memo.is_empty());

  assert!(memo.refresh(None, &q));
  assert!(memo.is_empty());
  assert!(memo.companies().is_empty());
}
