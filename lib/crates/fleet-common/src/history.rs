use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validate::Identified;

/// Kind of mutation recorded in the history log.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    Add,
    Update,
    Delete,
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
        };
        f.write_str(s)
    }
}

/// One immutable entry of an entity collection's audit trail.
///
/// `data` holds the post-mutation payload for `add` and `update`; a
/// `delete` tombstone carries none.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord<T> {
    pub time: DateTime<Utc>,
    pub action: HistoryAction,
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Identified> HistoryRecord<T> {
    #[must_use]
    pub fn added(item: T) -> Self {
        Self::with_payload(HistoryAction::Add, item)
    }

    #[must_use]
    pub fn updated(item: T) -> Self {
        Self::with_payload(HistoryAction::Update, item)
    }

    fn with_payload(action: HistoryAction, item: T) -> Self {
        Self {
            time: Utc::now(),
            action,
            id: item.id(),
            data: Some(item),
        }
    }
}

impl<T> HistoryRecord<T> {
    #[must_use]
    pub fn deleted(id: Uuid) -> Self {
        Self {
            time: Utc::now(),
            action: HistoryAction::Delete,
            id,
            data: None,
        }
    }
}
