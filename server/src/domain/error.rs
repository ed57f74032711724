//! Typed repository errors.

use fleet_common::{HistoryAction, ValidationError};
use thiserror::Error;
use uuid::Uuid;

/// Coarse classification for transport layers (bad input, not found,
/// conflict, server fault).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Internal,
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("entity {0} not found")]
    NotFound(Uuid),

    #[error("entity {0} already exists")]
    Conflict(Uuid),

    #[error("internal storage error: {0:#}")]
    Internal(anyhow::Error),

    /// The primary store accepted the mutation but the history log did
    /// not. The entity state has changed.
    #[error("{action} of {id} was applied but its history record was not written: {cause:#}")]
    HistoryAppend {
        id: Uuid,
        action: HistoryAction,
        cause: anyhow::Error,
    },
}

impl RepositoryError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Internal(_) | Self::HistoryAppend { .. } => ErrorKind::Internal,
        }
    }

    /// True when the error was raised after the primary store changed.
    /// Callers must not assume an error implies no state change.
    #[must_use]
    pub fn mutation_applied(&self) -> bool {
        matches!(self, Self::HistoryAppend { .. })
    }
}
