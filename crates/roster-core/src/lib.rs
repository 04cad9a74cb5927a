//! Core types for the Roster user directory.
//!
//! Holds the user model, the interaction state of a directory view, and the
//! pure derivation from (collection, query) to the rows a renderer displays.
//! This crate performs no I/O.

pub mod query;
pub mod user;
pub mod view;
