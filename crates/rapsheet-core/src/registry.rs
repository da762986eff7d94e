//! [`Registry`] — the owner-gated, notifying front of a [`RecordStore`].
//!
//! Every mutating call runs the same path: owner gate, backend mutation,
//! notification. Mutations are serialised behind one async mutex so that
//! notifications leave in the same order the mutations were applied. Reads
//! skip the gate and the mutex.

use std::marker::PhantomData;

use tokio::sync::Mutex;

use crate::{
  Error, Result,
  cnic::Cnic,
  gate::AccessGate,
  identity::Identity,
  notify::{Event, Notification, Notifier},
  record::Record,
  store::RecordStore,
};

pub struct Registry<R, S> {
  store:    S,
  gate:     AccessGate,
  notifier: Box<dyn Notifier>,
  writer:   Mutex<()>,
  _record:  PhantomData<fn() -> R>,
}

impl<R, S> Registry<R, S>
where
  R: Record,
  S: RecordStore<R>,
{
  /// Build a registry over `store`. `deployer` becomes the owner for the
  /// lifetime of the registry.
  pub fn new(store: S, deployer: Identity) -> Self {
    Self {
      store,
      gate: AccessGate::new(deployer),
      notifier: Box::new(()),
      writer: Mutex::new(()),
      _record: PhantomData,
    }
  }

  /// Replace the notifier. Without one, notifications are discarded.
  pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
    self.notifier = Box::new(notifier);
    self
  }

  pub fn owner(&self) -> &Identity { self.gate.owner() }


  // ── Mutations ─────────────────────────────────────────────────────────────

  /// Write `record` at its embedded CNIC. An existing record at that CNIC is
  /// overwritten.
  pub async fn create_entity(&self, record: R, caller: &Identity) -> Result<()> {
    self.gate.require_owner(caller)?;

    let cnic = record.cnic();
    let entity_id = record.entity_id();
    let sensitivity = record.sensitivity();

    let _guard = self.writer.lock().await;
    self.store.put(record).await.map_err(Error::store)?;
    self.emit(Event::EntityCreated {
      cnic,
      entity_id,
      owner: caller.clone(),
      sensitivity,
    });
    Ok(())
  }

  /// Replace the record at `cnic` wholesale. Fails with
  /// [`Error::NotFound`] if there is nothing to replace.
  pub async fn update_entity(
    &self,
    cnic: Cnic,
    record: R,
    caller: &Identity,
  ) -> Result<()> {
    self.gate.require_owner(caller)?;

    if record.cnic() != cnic {
      return Err(Error::CnicMismatch { key: cnic, record: record.cnic() });
    }
    let entity_id = record.entity_id();

    let _guard = self.writer.lock().await;
    let replaced = self
      .store
      .replace(cnic, record)
      .await
      .map_err(Error::store)?;
    if !replaced {
      return Err(Error::NotFound(cnic));
    }
    self.emit(Event::EntityUpdated { cnic, entity_id });
    Ok(())
  }

  /// Remove the record at `cnic`. Deleting an absent key succeeds.
  pub async fn delete_entity(&self, cnic: Cnic, caller: &Identity) -> Result<()> {
    self.gate.require_owner(caller)?;

    let _guard = self.writer.lock().await;
    let existed = self.store.remove(cnic).await.map_err(Error::store)?;
    self.emit(Event::EntityDeleted { cnic, existed });
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// Fetch the record at `cnic`. Open to any caller.
  pub async fn get_entity(&self, cnic: Cnic, _caller: &Identity) -> Result<R> {
    if !self.contains_entity(cnic).await? {
      return Err(Error::NotFound(cnic));
    }
    // A delete may land between the two calls.
    self
      .store
      .get(cnic)
      .await
      .map_err(Error::store)?
      .ok_or(Error::NotFound(cnic))
  }

  pub async fn contains_entity(&self, cnic: Cnic) -> Result<bool> {
    self.store.contains(cnic).await.map_err(Error::store)
  }

  /// Number of records currently held.
  pub async fn len(&self) -> Result<usize> {
    self.store.len().await.map_err(Error::store)
  }

  fn emit(&self, event: Event) {
    self.notifier.notify(&Notification::new(event));
  }
}
