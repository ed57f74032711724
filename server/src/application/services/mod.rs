//! Application services: use-case orchestration.
//!
//! Services compose port trait calls and never import from `crate::infra`.

pub mod fleet;
pub mod history;
pub mod ingest;
pub mod notifier;
pub mod supervisor;
