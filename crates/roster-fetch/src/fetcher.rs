//! The fetch half of the cache: how a key turns into a value.

use std::{future::Future, marker::PhantomData, time::Duration};

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::FetchError;

/// Resolves a cache key to a freshly fetched value.
///
/// Implementations own everything they need; the returned future must be
/// `Send` so the cache can drive it on a spawned task.
pub trait Fetcher<K>: Send + Sync + 'static {
  type Output: Send + Sync + 'static;

  fn fetch(&self, key: &K) -> impl Future<Output = Result<Self::Output, FetchError>> + Send;
}

/// Fetches a URL with a plain `GET` and decodes the JSON body into `T`.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
pub struct JsonFetcher<T> {
  client:  Client,
  _output: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonFetcher<T> {
  fn clone(&self) -> Self {
    Self {
      client:  self.client.clone(),
      _output: PhantomData,
    }
  }
}

impl<T> JsonFetcher<T> {
  pub fn new() -> Result<Self, FetchError> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(FetchError::Client)?;
    Ok(Self::with_client(client))
  }

  pub fn with_client(client: Client) -> Self {
    Self {
      client,
      _output: PhantomData,
    }
  }
}

impl<T> Fetcher<String> for JsonFetcher<T>
where
  T: DeserializeOwned + Send + Sync + 'static,
{
  type Output = T;

  fn fetch(&self, url: &String) -> impl Future<Output = Result<T, FetchError>> + Send {
    let request = self.client.get(url.as_str());
    async move {
      let resp = request
        .send()
        .await
        .map_err(|e| FetchError::Transport(Box::new(e)))?;

      let status = resp.status();
      if !status.is_success() {
        return Err(FetchError::Status {
          status: status.as_u16(),
        });
      }
      resp
        .json::<T>()
        .await
        .map_err(|e| FetchError::Decode(Box::new(e)))
    }
  }
}
