//! The national identity number used as the primary key of every record.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

const MIN: u64 = 1_000_000_000_000;
const MAX: u64 = 9_999_999_999_999;

/// A 13-digit CNIC.
///
/// Serialises as a bare integer. Parses from either plain digits
/// (`1234567890123`) or the dashed display form (`12345-6789012-3`).
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u64", into = "u64")]
pub struct Cnic(u64);

impl Cnic {
  pub fn new(value: u64) -> Result<Self, Error> {
    if (MIN..=MAX).contains(&value) {
      Ok(Self(value))
    } else {
      Err(Error::InvalidCnic(value.to_string()))
    }
  }

  pub fn get(self) -> u64 { self.0 }

  /// The `#####-#######-#` form printed on the card itself.
  pub fn dashed(self) -> String {
    let digits = self.0.to_string();
    format!("{}-{}-{}", &digits[..5], &digits[5..12], &digits[12..])
  }
}

impl TryFrom<u64> for Cnic {
  type Error = Error;

  fn try_from(value: u64) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<Cnic> for u64 {
  fn from(c: Cnic) -> Self { c.0 }
}

impl FromStr for Cnic {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let trimmed = s.trim();
    let dashes = trimmed.matches('-').count();
    let well_formed = match dashes {
      0 => true,
      // Dashes are only accepted in their printed positions.
      2 => trimmed.len() == 15
        && trimmed.as_bytes()[5] == b'-'
        && trimmed.as_bytes()[13] == b'-',
      _ => false,
    };
    let digits: String = trimmed.chars().filter(|c| *c != '-').collect();
    if !well_formed
      || digits.len() != 13
      || !digits.bytes().all(|b| b.is_ascii_digit())
    {
      return Err(Error::InvalidCnic(s.to_owned()));
    }
    let value = digits
      .parse::<u64>()
      .map_err(|_| Error::InvalidCnic(s.to_owned()))?;
    Self::new(value)
  }
}

impl fmt::Display for Cnic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
