//! Remote data source for Roster.
//!
//! [`Cache`] is a keyed, deduplicating fetch cache: callers asking for the same
//! key within the dedup window share one request, results are published to
//! subscribers through `tokio::sync::watch`, and a monotonically increasing
//! generation per key keeps a slow, older response from overwriting a newer
//! one. [`Resource`] binds a cache to one (optional) key, and [`users`] binds
//! it to the directory endpoint.
//!
//! Requests are driven by spawned tokio tasks, so every constructor or method
//! that starts a request must run inside a tokio runtime.

pub mod cache;
pub mod connectivity;
pub mod error;
pub mod fetcher;
pub mod resource;
pub mod users;

pub use cache::{Cache, CacheConfig, Outcome, Request, Snapshot};
pub use error::FetchError;
pub use fetcher::{Fetcher, JsonFetcher};
pub use resource::Resource;
