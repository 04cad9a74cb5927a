//! Fetch error taxonomy.

use thiserror::Error;

type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Why a fetch produced no data.
#[derive(Debug, Error)]
pub enum FetchError {
  /// No response reached us (DNS, connect, TLS, timeout...).
  #[error("request failed: {0}")]
  Transport(#[source] Cause),

  /// The server answered with a non-success status.
  #[error("HTTP error! status: {status}")]
  Status { status: u16 },

  /// The body was not the expected JSON shape.
  #[error("failed to decode response body: {0}")]
  Decode(#[source] Cause),

  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  #[error("invalid endpoint {0:?}")]
  InvalidEndpoint(String),
}

impl FetchError {
  /// The HTTP status carried by a [`FetchError::Status`].
  pub fn status(&self) -> Option<u16> {
    match self {
      Self::Status { status } => Some(*status),
      _ => None,
    }
  }
}
