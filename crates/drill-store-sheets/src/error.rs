//! Error type for `drill-store-sheets`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{operation} → {status}: {body}")]
  Status {
    operation: &'static str,
    status:    reqwest::StatusCode,
    body:      String,
  },

  #[error("invalid api base url {0:?}")]
  BaseUrl(String),

  #[error("worksheet has no {0:?} column")]
  MissingHeader(&'static str),

  #[error("row {row}: invalid {column} value {value:?}")]
  InvalidCell {
    /// 1-based sheet row, header included.
    row:    usize,
    column: &'static str,
    value:  String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
