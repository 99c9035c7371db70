//! Error types for `carrel-client`.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
  /// Connection, DNS or protocol failure before a response arrived.
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  /// The backend rejected the bearer token. The shared session has already
  /// been invalidated by the time this is returned.
  #[error("session rejected by the backend")]
  Unauthorized,

  /// Any non-2xx status other than 401.
  #[error("{method} {path} → {status}")]
  Status {
    method: &'static str,
    path:   String,
    status: StatusCode,
  },

  /// A 2xx response whose body did not match the expected shape.
  #[error("decoding {path}: {source}")]
  Decode {
    path:   String,
    #[source]
    source: reqwest::Error,
  },

  /// A fetch exceeded its cycle budget.
  #[error("request timed out")]
  Timeout,

  /// The alert stream ended or produced an unreadable frame.
  #[error("alert stream: {0}")]
  Stream(String),
}

impl ApiError {
  /// True when retrying later without operator action could succeed.
  pub fn is_transient(&self) -> bool {
    matches!(self, Self::Transport(_) | Self::Timeout | Self::Stream(_))
  }
}

pub type ApiResult<T> = Result<T, ApiError>;
