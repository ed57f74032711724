//! Identity and self-validation contracts shared by every entity.

use thiserror::Error;
use uuid::Uuid;

/// Why an entity was rejected before persistence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    NilId { field: &'static str },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("id mismatch: path has {path} but body has {body}")]
    IdMismatch { path: Uuid, body: Uuid },

    #[error("invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// An entity with a caller-assigned, immutable identity.
pub trait Identified {
    fn id(&self) -> Uuid;
}

/// A record that can check its own invariants.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Rejects the nil UUID for the named field.
pub fn require_id(field: &'static str, id: Uuid) -> Result<(), ValidationError> {
    if id.is_nil() {
        return Err(ValidationError::NilId { field });
    }
    Ok(())
}

/// Rejects empty or whitespace-only strings for the named field.
pub fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

/// Runs `validate()` across a batch of entities.
///
/// Stops at the first failure. Has no side effects.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    /// True iff every entity validates.
    #[must_use]
    pub fn is_valid(&self, items: &[&dyn Validate]) -> bool {
        self.check(items).is_ok()
    }

    /// Returns the first validation failure, if any.
    pub fn check(&self, items: &[&dyn Validate]) -> Result<(), ValidationError> {
        for item in items {
            item.validate()?;
        }
        Ok(())
    }
}
