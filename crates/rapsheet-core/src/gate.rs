//! The owner gate consulted before every mutating call.

use crate::{Error, Result, identity::Identity};

/// Holds the single owner identity captured when the registry is built.
///
/// There is no way to change the owner after construction.
#[derive(Debug, Clone)]
pub struct AccessGate {
  owner: Identity,
}

impl AccessGate {
  pub fn new(owner: Identity) -> Self { Self { owner } }

  pub fn owner(&self) -> &Identity { &self.owner }

  /// Succeed only if `caller` is the owner.
  pub fn require_owner(&self, caller: &Identity) -> Result<()> {
    if *caller == self.owner {
      Ok(())
    } else {
      Err(Error::AccessDenied(caller.clone()))
    }
  }
}
