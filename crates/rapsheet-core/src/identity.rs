//! Caller identities.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Error;

/// An opaque caller identity: an account name, an address, or any other
/// string the surrounding system authenticates.
///
/// Every operation on the registry takes the acting identity explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
  pub fn new(value: impl Into<String>) -> Result<Self, Error> {
    let value = value.into();
    if value.trim().is_empty() {
      return Err(Error::EmptyIdentity);
    }
    Ok(Self(value))
  }

  /// The identity attached to unauthenticated readers.
  pub fn anonymous() -> Self { Self("anonymous".to_owned()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl TryFrom<String> for Identity {
  type Error = Error;

  fn try_from(value: String) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<Identity> for String {
  fn from(id: Identity) -> Self { id.0 }
}

impl fmt::Display for Identity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
