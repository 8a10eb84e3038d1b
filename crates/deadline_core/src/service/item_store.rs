//! Item store: the in-memory collection with write-through persistence.
//!
//! # Responsibility
//! - Own the item collection for one session and expose CRUD on it.
//! - Restore the collection from a persistence slot, falling back to seed data.
//! - Write the full collection back to the slot after every mutation.
//!
//! # Invariants
//! - Item ids are unique within the collection.
//! - New ids come from a counter that only moves forward until it is exhausted.
//! - In-memory state is the writer of record; a failed slot write never
//!   rolls back a mutation.
//! - Loading never fails; unreadable snapshots are replaced by seed data.

use crate::model::item::{Item, ItemFields, ItemId, ItemValidationError};
use crate::model::seed::seed_items;
use crate::repo::slot::{PersistenceSlot, SlotError};
use crate::repo::snapshot::{decode_snapshot, encode_snapshot, SnapshotError};
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned to callers of store mutators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(ItemId),
    Validation(ItemValidationError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<ItemValidationError> for StoreError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Non-fatal failure to replicate the collection into the slot.
#[derive(Debug)]
pub enum PersistenceWriteError {
    Encode(SnapshotError),
    Slot(SlotError),
}

impl Display for PersistenceWriteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode items: {err}"),
            Self::Slot(err) => write!(f, "failed to write items: {err}"),
        }
    }
}

impl Error for PersistenceWriteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Slot(err) => Some(err),
        }
    }
}

/// Why the seed set was used instead of stored data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedReason {
    /// Slot has never been written or was cleared.
    Missing,
    /// Slot holds an empty collection.
    Empty,
    /// Slot payload failed to decode.
    Malformed(String),
    /// Slot backend failed to read.
    ReadFailed(String),
}

/// Where the current collection came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    Stored,
    Seed(SeedReason),
}

/// Reads a slot into a collection, substituting seed data on any problem.
pub fn load_snapshot(slot: &impl PersistenceSlot) -> (Vec<Item>, LoadSource) {
    let reason = match slot.read() {
        Ok(Some(payload)) => match decode_snapshot(&payload) {
            Ok(items) if !items.is_empty() => {
                info!(
                    "event=store_load module=store status=ok source=stored count={}",
                    items.len()
                );
                return (items, LoadSource::Stored);
            }
            Ok(_) => SeedReason::Empty,
            Err(err) => {
                warn!(
                    "event=store_load module=store status=recovered error_code=snapshot_invalid slot={} error={}",
                    slot.slot_key(),
                    err
                );
                SeedReason::Malformed(err.to_string())
            }
        },
        Ok(None) => SeedReason::Missing,
        Err(err) => {
            warn!(
                "event=store_load module=store status=recovered error_code=slot_read_failed slot={} error={}",
                slot.slot_key(),
                err
            );
            SeedReason::ReadFailed(err.to_string())
        }
    };

    let items = seed_items();
    info!(
        "event=store_load module=store status=ok source=seed reason={:?} count={}",
        reason,
        items.len()
    );
    (items, LoadSource::Seed(reason))
}

/// Monotonic id source; never hands out an id that is in the collection.
///
/// Once the counter passes `ItemId::MAX` it is exhausted and ids come from the
/// smallest positive value not currently in use.
#[derive(Debug, Clone, Copy)]
struct IdAllocator {
    /// `None` once the counter has run past `ItemId::MAX`.
    next: Option<ItemId>,
}

impl IdAllocator {
    fn new() -> Self {
        Self { next: Some(1) }
    }

    /// Moves past every id already present in `items`.
    fn observe(&mut self, items: &[Item]) {
        let Some(max) = items.iter().map(|item| item.id).max() else {
            return;
        };
        self.next = match (self.next, max.checked_add(1)) {
            (Some(next), Some(after_max)) => Some(next.max(after_max)),
            _ => None,
        };
    }

    fn allocate(&mut self, items: &[Item]) -> ItemId {
        if let Some(id) = self.next {
            self.next = id.checked_add(1);
            return id;
        }
        let used = items.iter().map(|item| item.id).collect::<HashSet<_>>();
        // A collection never holds every positive id.
        (1..=ItemId::MAX)
            .find(|id| !used.contains(id))
            .unwrap_or(ItemId::MIN)
    }
}

/// Session-owned item collection bound to one persistence slot.
pub struct ItemStore<S: PersistenceSlot> {
    slot: S,
    items: Vec<Item>,
    ids: IdAllocator,
    load_source: LoadSource,
    write_error: Option<PersistenceWriteError>,
}

impl<S: PersistenceSlot> ItemStore<S> {
    /// Creates a store and restores its collection from `slot`.
    pub fn open(slot: S) -> Self {
        let mut store = Self {
            slot,
            items: Vec::new(),
            ids: IdAllocator::new(),
            load_source: LoadSource::Seed(SeedReason::Missing),
            write_error: None,
        };
        store.load();
        store
    }

    /// Re-reads the slot, replacing the in-memory collection.
    ///
    /// Never fails: missing, empty or corrupt data yields the seed set.
    pub fn load(&mut self) -> &[Item] {
        let (items, source) = load_snapshot(&self.slot);
        self.ids.observe(&items);
        self.items = items;
        self.load_source = source;
        &self.items
    }

    /// Current collection in storage order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Source of the collection at the last `load`.
    pub fn load_source(&self) -> &LoadSource {
        &self.load_source
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Returns and clears the most recent persistence write failure.
    pub fn take_write_error(&mut self) -> Option<PersistenceWriteError> {
        self.write_error.take()
    }

    /// Appends a new item with a fresh id.
    pub fn create(&mut self, fields: ItemFields) -> StoreResult<Item> {
        fields.validate()?;

        let item = Item::from_fields(self.ids.allocate(&self.items), fields);
        self.items.push(item.clone());
        info!(
            "event=item_create module=store status=ok item_id={} total={}",
            item.id,
            self.items.len()
        );
        self.persist("create");
        Ok(item)
    }

    /// Replaces every field of `id` except the id itself.
    pub fn update(&mut self, id: ItemId, fields: ItemFields) -> StoreResult<Item> {
        fields.validate()?;

        let item = self.get_mut(id)?;
        item.apply(fields);
        let updated = item.clone();
        info!("event=item_update module=store status=ok item_id={id}");
        self.persist("update");
        Ok(updated)
    }

    /// Removes `id`; absent ids are a no-op that still persists.
    pub fn delete(&mut self, id: ItemId) {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        let removed = before != self.items.len();
        info!("event=item_delete module=store status=ok item_id={id} removed={removed}");
        self.persist("delete");
    }

    /// Flips the `completed` flag of `id`.
    pub fn toggle_complete(&mut self, id: ItemId) -> StoreResult<Item> {
        let item = self.get_mut(id)?;
        item.completed = !item.completed;
        let toggled = item.clone();
        info!(
            "event=item_toggle module=store status=ok item_id={id} completed={}",
            toggled.completed
        );
        self.persist("toggle_complete");
        Ok(toggled)
    }

    /// Empties the collection and clears the slot.
    ///
    /// Irreversible. Callers are expected to confirm with the user first.
    pub fn clear_all(&mut self) {
        let removed = self.items.len();
        self.items.clear();
        info!("event=store_clear module=store status=ok removed={removed}");
        if let Err(err) = self.slot.clear() {
            self.record_write_error("clear_all", PersistenceWriteError::Slot(err));
        }
    }

    fn get_mut(&mut self, id: ItemId) -> StoreResult<&mut Item> {
        self.items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn persist(&mut self, op: &'static str) {
        let result = encode_snapshot(&self.items)
            .map_err(PersistenceWriteError::Encode)
            .and_then(|payload| {
                self.slot
                    .write(&payload)
                    .map_err(PersistenceWriteError::Slot)
            });
        if let Err(err) = result {
            self.record_write_error(op, err);
        }
    }

    fn record_write_error(&mut self, op: &'static str, err: PersistenceWriteError) {
        warn!(
            "event=store_persist module=store status=error op={op} slot={} error={}",
            self.slot.slot_key(),
            err
        );
        self.write_error = Some(err);
    }
}

#[cfg(test)]
mod tests {
    use super::IdAllocator;
    use crate::model::item::{Item, ItemFields, ItemId, ItemType};
    use crate::model::seed::seed_items;
    use chrono::NaiveDate;

    fn item(id: ItemId) -> Item {
        let deadline = NaiveDate::from_ymd_opt(2025, 11, 20).unwrap();
        Item::from_fields(id, ItemFields::new("x", ItemType::Forum, deadline))
    }

    #[test]
    fn allocator_skips_past_observed_ids() {
        let items = seed_items();
        let mut ids = IdAllocator::new();
        ids.observe(&items);
        assert_eq!(ids.allocate(&items), 5);
        assert_eq!(ids.allocate(&items), 6);
    }

    #[test]
    fn allocator_never_moves_backwards() {
        let items = seed_items();
        let mut ids = IdAllocator::new();
        ids.observe(&items);
        ids.allocate(&items);
        ids.observe(&[]);
        assert_eq!(ids.allocate(&[]), 6);
    }

    #[test]
    fn allocator_falls_back_to_smallest_free_id_when_exhausted() {
        let items = vec![item(1), item(2), item(4), item(ItemId::MAX)];
        let mut ids = IdAllocator::new();
        ids.observe(&items);
        assert_eq!(ids.allocate(&items), 3);

        let mut items = items;
        items.push(item(3));
        assert_eq!(ids.allocate(&items), 5);
    }

    #[test]
    fn allocator_hands_out_max_id_once() {
        let items = vec![item(ItemId::MAX - 1)];
        let mut ids = IdAllocator::new();
        ids.observe(&items);
        assert_eq!(ids.allocate(&items), ItemId::MAX);

        let items = vec![item(ItemId::MAX - 1), item(ItemId::MAX)];
        assert_eq!(ids.allocate(&items), 1);
    }
}
