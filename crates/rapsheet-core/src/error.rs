//! Error types for `rapsheet-core`.

use thiserror::Error;

use crate::{cnic::Cnic, identity::Identity};

#[derive(Debug, Error)]
pub enum Error {
  /// A mutating call was issued by someone other than the owner.
  #[error("Access denied")]
  AccessDenied(Identity),

  #[error("Criminal data not found")]
  NotFound(Cnic),

  /// An update body names a different CNIC than the key it is stored under.
  #[error("record CNIC {record} does not match key {key}")]
  CnicMismatch { key: Cnic, record: Cnic },

  #[error("invalid CNIC: {0:?}")]
  InvalidCnic(String),

  #[error("unknown severity code: {0}")]
  InvalidSeverity(u8),

  #[error("unknown severity: {0:?}")]
  UnknownSeverity(String),

  #[error("identity must not be empty")]
  EmptyIdentity,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
