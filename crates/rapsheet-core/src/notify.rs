//! Change notifications emitted after successful mutations.
//!
//! A notification is an immutable fact about a mutation that already
//! happened. Nothing read from a notifier ever flows back into the store.

use std::{
  collections::VecDeque,
  sync::{Arc, Mutex, PoisonError},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{cnic::Cnic, identity::Identity, record::Severity};

// ─── Events ──────────────────────────────────────────────────────────────────

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum Event {
  EntityCreated {
    cnic:        Cnic,
    entity_id:   u64,
    /// The caller that performed the creation.
    owner:       Identity,
    /// Only present for schemas that carry a sensitivity level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sensitivity: Option<Severity>,
  },
  EntityUpdated {
    cnic:      Cnic,
    entity_id: u64,
  },
  EntityDeleted {
    cnic:    Cnic,
    /// `false` when the delete targeted a key that was already absent.
    existed: bool,
  },
}

impl Event {
  /// The event name, e.g. `"EntityCreated"`.
  pub fn name(&self) -> &'static str {
    match self {
      Self::EntityCreated { .. } => "EntityCreated",
      Self::EntityUpdated { .. } => "EntityUpdated",
      Self::EntityDeleted { .. } => "EntityDeleted",
    }
  }

  pub fn cnic(&self) -> Cnic {
    match self {
      Self::EntityCreated { cnic, .. }
      | Self::EntityUpdated { cnic, .. }
      | Self::EntityDeleted { cnic, .. } => *cnic,
    }
  }
}

/// An [`Event`] stamped with an id and the time it was emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
  pub event_id:    Uuid,
  pub recorded_at: DateTime<Utc>,
  #[serde(flatten)]
  pub event:       Event,
}

impl Notification {
  pub fn new(event: Event) -> Self {
    Self { event_id: Uuid::new_v4(), recorded_at: Utc::now(), event }
  }
}

// ─── Notifier ────────────────────────────────────────────────────────────────

/// A sink for notifications.
///
/// Called while the registry holds its mutation lock, so implementations must
/// not block.
pub trait Notifier: Send + Sync {
  fn notify(&self, notification: &Notification);
}

/// Discards everything.
impl Notifier for () {
  fn notify(&self, _: &Notification) {}
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
  fn notify(&self, notification: &Notification) {
    (**self).notify(notification);
  }
}

/// Live fan-out to every current subscriber.
impl Notifier for tokio::sync::broadcast::Sender<Notification> {
  fn notify(&self, notification: &Notification) {
    // Having no subscribers is not an error.
    let _ = self.send(notification.clone());
  }
}

/// Delivers every notification to two notifiers, in order.
#[derive(Debug, Clone)]
pub struct Fanout<A, B>(pub A, pub B);

impl<A: Notifier, B: Notifier> Notifier for Fanout<A, B> {
  fn notify(&self, notification: &Notification) {
    self.0.notify(notification);
    self.1.notify(notification);
  }
}

// ─── EventLog ────────────────────────────────────────────────────────────────

/// A bounded in-memory history of notifications; the oldest entries are
/// dropped once `capacity` is reached.
#[derive(Debug)]
pub struct EventLog {
  capacity: usize,
  entries:  Mutex<VecDeque<Notification>>,
}

impl EventLog {
  pub const DEFAULT_CAPACITY: usize = 1024;

  pub fn new() -> Self { Self::with_capacity(Self::DEFAULT_CAPACITY) }

  pub fn with_capacity(capacity: usize) -> Self {
    Self { capacity: capacity.max(1), entries: Mutex::new(VecDeque::new()) }
  }

  /// A copy of the retained notifications, oldest first.
  pub fn snapshot(&self) -> Vec<Notification> {
    let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
    entries.iter().cloned().collect()
  }

  pub fn len(&self) -> usize {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl Default for EventLog {
  fn default() -> Self { Self::new() }
}

impl Notifier for EventLog {
  fn notify(&self, notification: &Notification) {
    let mut entries =
      self.entries.lock().unwrap_or_else(PoisonError::into_inner);
    if entries.len() == self.capacity {
      entries.pop_front();
    }
    entries.push_back(notification.clone());
  }
}
