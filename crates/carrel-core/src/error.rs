//! Error types for `carrel-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("CSV export failed: {0}")]
  Export(String),

  #[error("invalid payment callback: {0}")]
  InvalidCallback(String),
}

impl From<csv::Error> for Error {
  fn from(e: csv::Error) -> Self {
    Self::Export(e.to_string())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
