//! Error type for `hbnb-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A column held a value of the wrong SQL type, or too few columns came
  /// back.
  #[error("bad column in {table}: {detail}")]
  Column { table: &'static str, detail: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
