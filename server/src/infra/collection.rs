//! Operations over an ordered in-process collection, shared by the memory
//! and file-backed repositories. Callers hold the collection lock.

use fleet_common::{Entity, Validate, ValidationError, Validator};
use uuid::Uuid;

use crate::application::Observed;
use crate::domain::RepositoryError;

pub(crate) fn find<T: Entity>(items: &[T], id: Uuid) -> Result<T, RepositoryError> {
    items
        .iter()
        .find(|item| item.id() == id)
        .cloned()
        .ok_or(RepositoryError::NotFound(id))
}

pub(crate) fn check_add<T: Entity>(items: &[T], item: &T) -> Result<(), RepositoryError> {
    Validator.check(&[item as &dyn Validate])?;
    if items.iter().any(|existing| existing.id() == item.id()) {
        return Err(RepositoryError::Conflict(item.id()));
    }
    Ok(())
}

/// Validate an update body and pin its identity to the target id.
pub(crate) fn check_update<T: Entity>(id: Uuid, item: &T) -> Result<(), RepositoryError> {
    Validator.check(&[item as &dyn Validate])?;
    if item.id() != id {
        return Err(ValidationError::IdMismatch {
            path: id,
            body: item.id(),
        }
        .into());
    }
    Ok(())
}

pub(crate) fn replace<T: Entity>(items: &mut [T], id: Uuid, item: T) -> Result<(), RepositoryError> {
    let slot = items
        .iter_mut()
        .find(|existing| existing.id() == id)
        .ok_or(RepositoryError::NotFound(id))?;
    *slot = item;
    Ok(())
}

/// Removes while preserving the order of the remaining items.
pub(crate) fn remove<T: Entity>(items: &mut Vec<T>, id: Uuid) -> Result<T, RepositoryError> {
    let index = items
        .iter()
        .position(|existing| existing.id() == id)
        .ok_or(RepositoryError::NotFound(id))?;
    Ok(items.remove(index))
}

pub(crate) fn since<T: Entity>(items: &[T], seen: usize) -> Observed<T> {
    match items.get(seen..) {
        Some(appended) => Observed {
            len: items.len(),
            appended: appended.to_vec(),
        },
        None => Observed::unchanged(items.len()),
    }
}
