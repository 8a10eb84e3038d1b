//! Snapshot codec for the persisted item collection.
//!
//! The payload is a bare JSON array of item records. No version field is
//! written; a payload without one is read as version 0.
//!
//! # Invariants
//! - Decoded collections never contain duplicate ids or empty titles.
//! - Unknown `type` strings and non-normalized deadlines are rejected.

use crate::model::item::{Item, ItemId, ItemValidationError};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Stored payload could not be turned into a valid collection.
#[derive(Debug)]
pub enum SnapshotError {
    /// Not JSON, not an array, or a record with wrong field shapes.
    Malformed(serde_json::Error),
    /// A record decoded but breaks item invariants.
    InvalidItem {
        index: usize,
        reason: ItemValidationError,
    },
    DuplicateId(ItemId),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "malformed item snapshot: {err}"),
            Self::InvalidItem { index, reason } => {
                write!(f, "invalid item at index {index}: {reason}")
            }
            Self::DuplicateId(id) => write!(f, "duplicate item id {id} in snapshot"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            Self::InvalidItem { reason, .. } => Some(reason),
            Self::DuplicateId(_) => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value)
    }
}

/// Serializes the full collection in storage order.
pub fn encode_snapshot(items: &[Item]) -> SnapshotResult<String> {
    Ok(serde_json::to_string(items)?)
}

/// Parses and checks a stored payload.
pub fn decode_snapshot(payload: &str) -> SnapshotResult<Vec<Item>> {
    let items: Vec<Item> = serde_json::from_str(payload)?;

    let mut seen = HashSet::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        item.validate()
            .map_err(|reason| SnapshotError::InvalidItem { index, reason })?;
        if !seen.insert(item.id) {
            return Err(SnapshotError::DuplicateId(item.id));
        }
    }

    Ok(items)
}
