//! Keyed fetch cache with request deduplication.
//!
//! Each key owns one slot: the last good value, the last error, the most
//! recent request and a watch channel that publishes a [`Snapshot`] after
//! every change. A request started within `dedup_interval` of the previous
//! one for the same key is joined rather than repeated, whether it is still
//! pending or already finished.
//!
//! Responses are applied in generation order. Each request takes the next
//! generation number for its key; a response older than the one already
//! applied is dropped, so when a forced refresh overtakes an earlier request
//! the newest request's result is what remains in the slot.

use std::{
  collections::HashMap,
  fmt::Debug,
  hash::Hash,
  sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
  time::Duration,
};

use futures::{
  FutureExt,
  future::{BoxFuture, Shared},
};
use tokio::{sync::watch, time::Instant};
use tracing::{debug, info, warn};

use crate::{error::FetchError, fetcher::Fetcher};

/// What a request resolves to. Both sides are shared so every caller joined
/// to the request receives the same allocation.
pub type Outcome<T> = Result<Arc<T>, Arc<FetchError>>;

/// Handle to a started request. Dropping it does not cancel the request.
pub type Request<T> = Shared<BoxFuture<'static, Outcome<T>>>;

// ─── Config ──────────────────────────────────────────────────────────────────

/// Revalidation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
  /// Requests for one key within this interval share a single fetch.
  pub dedup_interval:          Duration,
  /// Refresh subscribed keys when the front end regains focus.
  pub revalidate_on_focus:     bool,
  /// Refresh subscribed keys when network connectivity returns.
  pub revalidate_on_reconnect: bool,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      dedup_interval:          Duration::from_secs(60),
      revalidate_on_focus:     false,
      revalidate_on_reconnect: true,
    }
  }
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// Observable state of one key.
///
/// After a failed refresh `data` still holds the previous good value while
/// `error` describes the failure; a successful response clears `error`.
#[derive(Debug)]
pub struct Snapshot<T> {
  pub data:          Option<Arc<T>>,
  pub error:         Option<Arc<FetchError>>,
  /// A request for this key is outstanding.
  pub is_validating: bool,
}

impl<T> Snapshot<T> {
  /// Outstanding request and nothing to show yet.
  pub fn is_loading(&self) -> bool {
    self.is_validating && self.data.is_none()
  }
}

impl<T> Default for Snapshot<T> {
  fn default() -> Self {
    Self {
      data:          None,
      error:         None,
      is_validating: false,
    }
  }
}

impl<T> Clone for Snapshot<T> {
  fn clone(&self) -> Self {
    Self {
      data:          self.data.clone(),
      error:         self.error.clone(),
      is_validating: self.is_validating,
    }
  }
}

// ─── Slot ────────────────────────────────────────────────────────────────────

struct InFlight<T> {
  started: Instant,
  request: Request<T>,
}

struct Slot<T> {
  latest:  Option<InFlight<T>>,
  /// Generation handed to the most recently started request.
  issued:  u64,
  /// Generation of the response currently reflected in `state`.
  applied: u64,
  state:   watch::Sender<Snapshot<T>>,
}

impl<T> Slot<T> {
  fn new() -> Self {
    Self {
      latest:  None,
      issued:  0,
      applied: 0,
      state:   watch::channel(Snapshot::default()).0,
    }
  }

  fn has_error(&self) -> bool {
    self.state.borrow().error.is_some()
  }
}

// ─── Cache ───────────────────────────────────────────────────────────────────

struct Inner<K, F: Fetcher<K>> {
  fetcher: Arc<F>,
  config:  CacheConfig,
  slots:   Mutex<HashMap<K, Slot<F::Output>>>,
}

impl<K, F> Inner<K, F>
where
  K: Eq + Hash + Debug,
  F: Fetcher<K>,
{
  fn slots(&self) -> MutexGuard<'_, HashMap<K, Slot<F::Output>>> {
    self.slots.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Write a finished response into its slot unless a newer one is already
  /// there.
  fn apply(&self, key: &K, generation: u64, outcome: &Outcome<F::Output>) {
    let mut slots = self.slots();
    let Some(slot) = slots.get_mut(key) else {
      return;
    };

    if generation < slot.applied {
      debug!(?key, generation, applied = slot.applied, "discarding stale response");
      return;
    }
    slot.applied = generation;

    let still_validating = generation < slot.issued;
    slot.state.send_modify(|snap| {
      match outcome {
        Ok(data) => {
          snap.data = Some(Arc::clone(data));
          snap.error = None;
        }
        Err(e) => snap.error = Some(Arc::clone(e)),
      }
      snap.is_validating = still_validating;
    });
  }
}

/// Deduplicating fetch cache keyed by `K`.
///
/// Cheap to clone; clones share the same slots.
pub struct Cache<K, F: Fetcher<K>> {
  inner: Arc<Inner<K, F>>,
}

impl<K, F: Fetcher<K>> Clone for Cache<K, F> {
  fn clone(&self) -> Self {
    Self {
      inner: Arc::clone(&self.inner),
    }
  }
}

impl<K, F> Cache<K, F>
where
  K: Clone + Eq + Hash + Debug + Send + Sync + 'static,
  F: Fetcher<K>,
{
  pub fn new(fetcher: F, config: CacheConfig) -> Self {
    Self {
      inner: Arc::new(Inner {
        fetcher: Arc::new(fetcher),
        config,
        slots: Mutex::new(HashMap::new()),
      }),
    }
  }

  pub fn config(&self) -> &CacheConfig {
    &self.inner.config
  }

  // ── Requests ──────────────────────────────────────────────────────────

  /// Start a request for `key`, or join the one started within the dedup
  /// window.
  pub fn load(&self, key: &K) -> Request<F::Output> {
    self.request(key, false)
  }

  /// Resolve `key`, sharing any request started within the dedup window.
  pub async fn get(&self, key: &K) -> Outcome<F::Output> {
    self.load(key).await
  }

  /// Start a fresh request for `key` regardless of the dedup window.
  pub fn revalidate(&self, key: &K) -> Request<F::Output> {
    self.request(key, true)
  }

  /// Fire-and-forget form of [`Cache::revalidate`].
  pub fn mutate(&self, key: &K) {
    drop(self.revalidate(key));
  }

  fn request(&self, key: &K, force: bool) -> Request<F::Output> {
    let mut slots = self.inner.slots();
    let slot = slots.entry(key.clone()).or_insert_with(Slot::new);

    if !force
      && let Some(latest) = &slot.latest
      && latest.started.elapsed() < self.inner.config.dedup_interval
    {
      debug!(?key, generation = slot.issued, "joining deduplicated request");
      return latest.request.clone();
    }

    slot.issued += 1;
    let generation = slot.issued;

    let fetcher = Arc::clone(&self.inner.fetcher);
    let inner: Weak<Inner<K, F>> = Arc::downgrade(&self.inner);
    let owned_key = key.clone();
    let request = async move {
      info!(key = ?owned_key, generation, "fetch started");
      let outcome = fetcher
        .fetch(&owned_key)
        .await
        .map(Arc::new)
        .map_err(Arc::new);

      match &outcome {
        Ok(_) => info!(key = ?owned_key, generation, "fetch finished"),
        Err(e) => warn!(key = ?owned_key, generation, error = %e, "fetch failed"),
      }
      // The cache may have been dropped while the request was in flight.
      if let Some(inner) = inner.upgrade() {
        inner.apply(&owned_key, generation, &outcome);
      }
      outcome
    }
    .boxed()
    .shared();

    slot.latest = Some(InFlight {
      started: Instant::now(),
      request: request.clone(),
    });
    slot.state.send_modify(|snap| snap.is_validating = true);
    drop(slots);

    tokio::spawn(request.clone());
    request
  }

  // ── Observation ───────────────────────────────────────────────────────

  /// Current state of `key`; the default (empty) snapshot for unknown keys.
  pub fn snapshot(&self, key: &K) -> Snapshot<F::Output> {
    self
      .inner
      .slots()
      .get(key)
      .map(|slot| slot.state.borrow().clone())
      .unwrap_or_default()
  }

  /// Watch `key` for changes. Subscribing does not start a request.
  pub fn subscribe(&self, key: &K) -> watch::Receiver<Snapshot<F::Output>> {
    self
      .inner
      .slots()
      .entry(key.clone())
      .or_insert_with(Slot::new)
      .state
      .subscribe()
  }

  // ── Revalidation triggers ─────────────────────────────────────────────

  /// The front end regained focus. Returns the number of keys refreshed.
  pub fn on_focus(&self) -> usize {
    if !self.inner.config.revalidate_on_focus {
      return 0;
    }
    let keys = self.watched_keys(|_| false);
    for (key, force) in &keys {
      drop(self.request(key, *force));
    }
    keys.len()
  }

  /// Connectivity came back. Watched keys are refreshed through the dedup
  /// window, except keys whose last outcome was an error, which are always
  /// refetched. Returns the number of keys touched.
  pub fn on_reconnect(&self) -> usize {
    if !self.inner.config.revalidate_on_reconnect {
      return 0;
    }
    let keys = self.watched_keys(Slot::has_error);
    for (key, force) in &keys {
      drop(self.request(key, *force));
    }
    keys.len()
  }

  /// Keys with at least one live subscriber, paired with `force(slot)`.
  fn watched_keys(&self, force: impl Fn(&Slot<F::Output>) -> bool) -> Vec<(K, bool)> {
    self
      .inner
      .slots()
      .iter()
      .filter(|(_, slot)| slot.state.receiver_count() > 0)
      .map(|(key, slot)| (key.clone(), force(slot)))
      .collect()
  }
}
