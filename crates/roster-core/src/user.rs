//! User — one entry of the remote directory.
//!
//! Records are immutable once fetched. Field names follow the JSON served by
//! the directory endpoint.

use serde::{Deserialize, Serialize};

// ─── Nested values ───────────────────────────────────────────────────────────

/// A geographic coordinate pair, kept as served (decimal strings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geo {
  pub lat: String,
  pub lng: String,
}

/// A postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
  pub street:  String,
  pub suite:   String,
  pub city:    String,
  pub zipcode: String,
  pub geo:     Geo,
}

impl Address {
  /// Short location line shown by both layouts, e.g. `Gwenborough, 92998-3874`.
  pub fn summary(&self) -> String {
    format!("{}, {}", self.city, self.zipcode)
  }
}

/// The organisation a user belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
  pub name:         String,
  #[serde(rename = "catchPhrase")]
  pub catch_phrase: String,
  /// Business descriptor.
  pub bs:           String,
}

// ─── User ────────────────────────────────────────────────────────────────────

/// A directory entry. `id` is assigned by the remote source and is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id:       u64,
  pub name:     String,
  pub username: String,
  pub email:    String,
  pub address:  Address,
  pub phone:    String,
  pub website:  String,
  pub company:  Company,
}

impl User {
  /// The user's handle with a leading `@`.
  pub fn handle(&self) -> String {
    format!("@{}", self.username)
  }
}
