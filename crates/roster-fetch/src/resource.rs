//! A cache bound to one key — the consumer-facing side of the data source.

use std::{fmt::Debug, hash::Hash};

use tokio::sync::watch;

use crate::{
  cache::{Cache, Snapshot},
  fetcher::Fetcher,
};

/// One consumer's view of a cached key.
///
/// Creating a resource with `Some(key)` subscribes to the key and starts (or
/// joins) a request for it. A `None` key leaves the resource disabled: its
/// snapshot stays empty and nothing is fetched.
pub struct Resource<K, F: Fetcher<K>> {
  cache:   Cache<K, F>,
  key:     Option<K>,
  updates: watch::Receiver<Snapshot<F::Output>>,
  /// Keeps a disabled resource's channel open so `changed` never resolves.
  _idle:   Option<watch::Sender<Snapshot<F::Output>>>,
}

impl<K, F> Resource<K, F>
where
  K: Clone + Eq + Hash + Debug + Send + Sync + 'static,
  F: Fetcher<K>,
{
  pub fn new(cache: Cache<K, F>, key: Option<K>) -> Self {
    match key {
      Some(key) => {
        let updates = cache.subscribe(&key);
        drop(cache.load(&key));
        Self {
          cache,
          key: Some(key),
          updates,
          _idle: None,
        }
      }
      None => {
        let (idle, updates) = watch::channel(Snapshot::default());
        Self {
          cache,
          key: None,
          updates,
          _idle: Some(idle),
        }
      }
    }
  }

  pub fn key(&self) -> Option<&K> {
    self.key.as_ref()
  }

  pub fn cache(&self) -> &Cache<K, F> {
    &self.cache
  }

  /// Current data, error and loading flags.
  pub fn snapshot(&self) -> Snapshot<F::Output> {
    self.updates.borrow().clone()
  }

  /// Wait until the snapshot changes. Pending forever for a disabled resource.
  pub async fn changed(&mut self) {
    if self.updates.changed().await.is_err() {
      std::future::pending::<()>().await;
    }
  }

  /// Force a fresh fetch, ignoring the dedup window.
  pub fn mutate(&self) {
    if let Some(key) = &self.key {
      self.cache.mutate(key);
    }
  }
}
