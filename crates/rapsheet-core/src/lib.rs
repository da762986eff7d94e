//! Core types and trait definitions for the rapsheet record store.
//!
//! This crate is free of HTTP and database dependencies. Storage backends
//! implement [`store::RecordStore`]; the [`registry::Registry`] drives a
//! backend through the owner gate and the change notifier.

pub mod cnic;
pub mod error;
pub mod gate;
pub mod identity;
pub mod memory;
pub mod notify;
pub mod record;
pub mod registry;
pub mod store;

pub use cnic::Cnic;
pub use error::{Error, Result};
pub use identity::Identity;
pub use record::{CriminalRecord, FlatRecord, Record, Severity};
pub use registry::Registry;
