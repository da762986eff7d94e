//! Error type for `rapsheet-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// A stored row decoded to a record whose CNIC differs from its key column.
  #[error("row at cnic {key} holds a record for {found}")]
  CorruptRow { key: u64, found: u64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
