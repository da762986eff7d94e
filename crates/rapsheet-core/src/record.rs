//! Record types stored in the registry.
//!
//! Two schemas share the same store: the early [`FlatRecord`] and the
//! structured [`CriminalRecord`]. Both are keyed by their embedded [`Cnic`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{Error, cnic::Cnic};

// ─── Severity ────────────────────────────────────────────────────────────────

/// How sensitive a record (or how grave an offense) is.
///
/// Serialised as a lowercase name. Deserialisation also takes the numeric
/// code (`0`, `1`, `2`).
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase", try_from = "SeverityRepr")]
pub enum Severity {
  #[default]
  Low,
  Medium,
  High,
}

impl Severity {
  pub fn code(self) -> u8 {
    match self {
      Self::Low => 0,
      Self::Medium => 1,
      Self::High => 2,
    }
  }
}

impl TryFrom<u8> for Severity {
  type Error = Error;

  fn try_from(code: u8) -> Result<Self, Self::Error> {
    match code {
      0 => Ok(Self::Low),
      1 => Ok(Self::Medium),
      2 => Ok(Self::High),
      other => Err(Error::InvalidSeverity(other)),
    }
  }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SeverityRepr {
  Code(u8),
  Name(String),
}

impl TryFrom<SeverityRepr> for Severity {
  type Error = Error;

  fn try_from(repr: SeverityRepr) -> Result<Self, Self::Error> {
    match repr {
      SeverityRepr::Code(code) => Self::try_from(code),
      SeverityRepr::Name(name) => match name.as_str() {
        "low" => Ok(Self::Low),
        "medium" => Ok(Self::Medium),
        "high" => Ok(Self::High),
        _ => Err(Error::UnknownSeverity(name)),
      },
    }
  }
}

// ─── Record trait ────────────────────────────────────────────────────────────

/// A value that can live in a [`RecordStore`](crate::store::RecordStore).
pub trait Record:
  Clone + Send + Sync + Serialize + DeserializeOwned + 'static
{
  /// Schema tag; backends that hold several schemas partition on it.
  const KIND: &'static str;

  /// The primary key.
  fn cnic(&self) -> Cnic;

  /// The numeric sub-identifier reported in change notifications.
  fn entity_id(&self) -> u64;

  /// Sensitivity reported on creation, for schemas that carry one.
  fn sensitivity(&self) -> Option<Severity> { None }
}

// ─── Flat schema ─────────────────────────────────────────────────────────────

/// The early single-level schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRecord {
  pub name:        String,
  /// Caller-supplied identifier, distinct from the CNIC.
  pub id:          u64,
  pub cnic:        Cnic,
  pub sensitivity: Severity,
}

impl Record for FlatRecord {
  const KIND: &'static str = "flat";

  fn cnic(&self) -> Cnic { self.cnic }

  fn entity_id(&self) -> u64 { self.id }

  fn sensitivity(&self) -> Option<Severity> { Some(self.sensitivity) }
}

// ─── Structured schema ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalDetails {
  pub name:        String,
  pub father_name: String,
  pub age:         u32,
  pub cnic:        Cnic,
  pub location:    String,
  pub gender:      String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrimeDetails {
  pub id:                    u64,
  pub severity:              Severity,
  pub offense_description:   String,
  pub offense_code:          u64,
  pub offense_date:          NaiveDate,
  pub case_id:               u64,
  pub investigating_officer: String,
  pub court_verdict:         String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrisonDetails {
  pub location:     String,
  pub prison_id:    u64,
  /// Sentence length in whole years.
  pub tenure_years: u32,
  pub prison_code:  u64,
}

/// The structured schema: who the person is, what they did, where they are
/// held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriminalRecord {
  pub personal: PersonalDetails,
  pub crime:    CrimeDetails,
  pub prison:   PrisonDetails,
}

impl Record for CriminalRecord {
  const KIND: &'static str = "criminal";

  fn cnic(&self) -> Cnic { self.personal.cnic }

  fn entity_id(&self) -> u64 { self.crime.id }
}
