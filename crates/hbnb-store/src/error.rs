//! Error type for `hbnb-store`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("blob encoding error: {0}")]
  Blob(#[from] bincode::Error),

  /// A stored row could not be rebuilt, e.g. its type is not registered.
  #[error(transparent)]
  Domain(#[from] hbnb_core::Error),

  #[error(transparent)]
  Sqlite(#[from] hbnb_store_sqlite::Error),

  /// The storage file parsed but does not have the expected shape.
  #[error("malformed storage file: {0}")]
  Malformed(String),

  #[error("unknown repository backend {0:?}")]
  UnknownBackend(String),
}

impl From<std::convert::Infallible> for Error {
  fn from(never: std::convert::Infallible) -> Self { match never {} }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
