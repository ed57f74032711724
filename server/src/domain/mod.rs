//! Domain layer: repository error taxonomy.
//!
//! Entity types and validation live in `fleet_common`; this module only
//! adds what the persistence core reports back to callers.

pub mod error;

pub use error::{ErrorKind, RepositoryError};
