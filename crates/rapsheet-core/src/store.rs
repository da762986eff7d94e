//! The `RecordStore` trait implemented by storage backends.
//!
//! A backend owns the CNIC → record mapping and nothing else. Access control
//! and notifications live in [`Registry`](crate::registry::Registry), which is
//! the only intended caller of these methods.

use std::future::Future;

use crate::{cnic::Cnic, record::Record};

/// Abstraction over a keyed record backend.
///
/// Each method must be atomic with respect to every other method on the same
/// store: a reader never sees a record mid-write.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RecordStore<R: Record>: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Write `record` at its embedded CNIC, replacing any existing record.
  /// Returns `true` if a record was replaced.
  fn put(
    &self,
    record: R,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Fetch the record at `cnic`. Returns `None` if absent.
  fn get(
    &self,
    cnic: Cnic,
  ) -> impl Future<Output = Result<Option<R>, Self::Error>> + Send + '_;

  /// Membership test that does not materialise the record.
  fn contains(
    &self,
    cnic: Cnic,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Overwrite the record at `cnic` only if one is present.
  /// Returns `false`, without writing, if the key is absent.
  fn replace(
    &self,
    cnic: Cnic,
    record: R,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Remove the record at `cnic`. Returns `true` if one was present.
  fn remove(
    &self,
    cnic: Cnic,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Number of live records.
  fn len(&self) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
