//! Application layer: port trait definitions and the services built on them.
//!
//! This module depends only on `crate::domain` and `fleet_common`, never
//! on `crate::infra`.

pub mod ports;
pub mod services;

pub use ports::{DocumentStore, HistorySource, LogStore, Observe, Observed, Repository};
