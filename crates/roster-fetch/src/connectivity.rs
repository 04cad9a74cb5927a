//! Network reachability probe that feeds reconnect revalidation.
//!
//! The probe opens a TCP connection to the endpoint's host on a fixed
//! interval. A successful connect counts as online; a refused or timed-out
//! connect counts as offline.

use std::{fmt::Debug, hash::Hash, time::Duration};

use reqwest::Url;
use tokio::{
  net::TcpStream,
  sync::watch,
  task::JoinHandle,
  time::{self, MissedTickBehavior},
};
use tracing::{info, warn};

use crate::{cache::Cache, error::FetchError, fetcher::Fetcher};

#[derive(Debug, Clone)]
pub struct ConnectivityProbe {
  target:   String,
  interval: Duration,
  timeout:  Duration,
}

impl ConnectivityProbe {
  /// Probe the host (and port) that `endpoint` points at.
  pub fn for_endpoint(endpoint: &str, interval: Duration) -> Result<Self, FetchError> {
    let invalid = || FetchError::InvalidEndpoint(endpoint.to_owned());
    let url = Url::parse(endpoint).map_err(|_| invalid())?;
    let host = url.host_str().ok_or_else(invalid)?;
    let port = url.port_or_known_default().ok_or_else(invalid)?;
    Ok(Self::new(format!("{host}:{port}"), interval))
  }

  pub fn new(target: impl Into<String>, interval: Duration) -> Self {
    Self {
      target: target.into(),
      interval,
      timeout: Duration::from_secs(3),
    }
  }

  pub fn target(&self) -> &str {
    &self.target
  }

  /// One reachability check.
  pub async fn check(&self) -> bool {
    matches!(
      time::timeout(self.timeout, TcpStream::connect(&self.target)).await,
      Ok(Ok(_))
    )
  }

  /// Run the probe on a background task. The receiver starts at `true`
  /// (assumed online) and changes only on transitions. The task stops once
  /// every receiver is dropped.
  pub fn spawn(self) -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(true);
    tokio::spawn(async move {
      let mut ticker = time::interval(self.interval);
      ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
      loop {
        tokio::select! {
          _ = ticker.tick() => {}
          _ = tx.closed() => break,
        }
        let online = self.check().await;
        tx.send_if_modified(|current| {
          if *current == online {
            return false;
          }
          if online {
            info!(addr = %self.target, "network reachable");
          } else {
            warn!(addr = %self.target, "network unreachable");
          }
          *current = online;
          true
        });
      }
    });
    rx
  }
}

/// Call [`Cache::on_reconnect`] on every offline → online transition of
/// `online`. Ends when the sender side is dropped.
pub fn watch_reconnects<K, F>(cache: Cache<K, F>, mut online: watch::Receiver<bool>) -> JoinHandle<()>
where
  K: Clone + Eq + Hash + Debug + Send + Sync + 'static,
  F: Fetcher<K>,
{
  tokio::spawn(async move {
    let mut was_online = *online.borrow_and_update();
    while online.changed().await.is_ok() {
      let now_online = *online.borrow_and_update();
      if now_online && !was_online {
        let refreshed = cache.on_reconnect();
        info!(refreshed, "connectivity restored, revalidating");
      }
      was_online = now_online;
    }
  })
}
