//! [`MemoryStore`] — an in-process [`RecordStore`] backed by a `HashMap`.

use std::{
  collections::HashMap,
  convert::Infallible,
  sync::{Arc, PoisonError, RwLock},
};

use crate::{cnic::Cnic, record::Record, store::RecordStore};

/// A record map behind a single-writer/multi-reader lock.
///
/// Cloning is cheap and clones share the same map.
#[derive(Debug)]
pub struct MemoryStore<R> {
  records: Arc<RwLock<HashMap<Cnic, R>>>,
}

impl<R> MemoryStore<R> {
  pub fn new() -> Self {
    Self { records: Arc::new(RwLock::new(HashMap::new())) }
  }
}

impl<R> Default for MemoryStore<R> {
  fn default() -> Self { Self::new() }
}

impl<R> Clone for MemoryStore<R> {
  fn clone(&self) -> Self { Self { records: Arc::clone(&self.records) } }
}

// A poisoned lock only means another thread panicked mid-call; every write
// below is a single map operation, so the map itself is still consistent.

impl<R: Record> RecordStore<R> for MemoryStore<R> {
  type Error = Infallible;

  async fn put(&self, record: R) -> Result<bool, Infallible> {
    let mut map = self.records.write().unwrap_or_else(PoisonError::into_inner);
    Ok(map.insert(record.cnic(), record).is_some())
  }

  async fn get(&self, cnic: Cnic) -> Result<Option<R>, Infallible> {
    let map = self.records.read().unwrap_or_else(PoisonError::into_inner);
    Ok(map.get(&cnic).cloned())
  }

  async fn contains(&self, cnic: Cnic) -> Result<bool, Infallible> {
    let map = self.records.read().unwrap_or_else(PoisonError::into_inner);
    Ok(map.contains_key(&cnic))
  }

  async fn replace(&self, cnic: Cnic, record: R) -> Result<bool, Infallible> {
    let mut map = self.records.write().unwrap_or_else(PoisonError::into_inner);
    match map.get_mut(&cnic) {
      Some(slot) => {
        *slot = record;
        Ok(true)
      }
      None => Ok(false),
    }
  }

  async fn remove(&self, cnic: Cnic) -> Result<bool, Infallible> {
    let mut map = self.records.write().unwrap_or_else(PoisonError::into_inner);
    Ok(map.remove(&cnic).is_some())
  }

  async fn len(&self) -> Result<usize, Infallible> {
    let map = self.records.read().unwrap_or_else(PoisonError::into_inner);
    Ok(map.len())
  }
}
