//! Error type for `drill-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date parse error in {column} of {id:?}: {value:?}")]
  DateParse {
    id:     String,
    column: &'static str,
    value:  String,
  },

  /// A stored value does not fit the record model (e.g. a negative interval).
  #[error("invalid row {id:?}: {reason}")]
  InvalidRow { id: String, reason: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
