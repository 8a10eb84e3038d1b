use chrono::NaiveDate;
use deadline_core::db::open_db_in_memory;
use deadline_core::{
    decode_snapshot, seed_items, ItemFields, ItemStore, ItemType, ItemValidationError,
    LoadSource, MemorySlot, PersistenceSlot, PersistenceWriteError, SeedReason, SlotError,
    SlotResult, SqliteSlot, StoreError, SEED_ITEM_COUNT,
};
use std::cell::Cell;
use std::collections::HashSet;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn fields(title: &str) -> ItemFields {
    ItemFields::new(title, ItemType::Activity, date(2025, 12, 1))
}

/// Slot that reads fine but refuses writes while `failing` is set.
struct FlakySlot {
    inner: MemorySlot,
    failing: Cell<bool>,
}

impl PersistenceSlot for FlakySlot {
    fn slot_key(&self) -> &str {
        self.inner.slot_key()
    }

    fn read(&self) -> SlotResult<Option<String>> {
        self.inner.read()
    }

    fn write(&self, payload: &str) -> SlotResult<()> {
        if self.failing.get() {
            return Err(SlotError::Unavailable("quota exceeded".to_string()));
        }
        self.inner.write(payload)
    }

    fn clear(&self) -> SlotResult<()> {
        if self.failing.get() {
            return Err(SlotError::Unavailable("quota exceeded".to_string()));
        }
        self.inner.clear()
    }
}

/// Slot whose backend is gone entirely.
struct BrokenSlot;

impl PersistenceSlot for BrokenSlot {
    fn slot_key(&self) -> &str {
        "broken"
    }

    fn read(&self) -> SlotResult<Option<String>> {
        Err(SlotError::Unavailable("disk missing".to_string()))
    }

    fn write(&self, _payload: &str) -> SlotResult<()> {
        Err(SlotError::Unavailable("disk missing".to_string()))
    }

    fn clear(&self) -> SlotResult<()> {
        Err(SlotError::Unavailable("disk missing".to_string()))
    }
}

#[test]
fn load_on_missing_slot_returns_seed_set() {
    let slot = MemorySlot::new();
    let store = ItemStore::open(&slot);

    assert_eq!(store.items(), seed_items().as_slice());
    assert_eq!(store.load_source(), &LoadSource::Seed(SeedReason::Missing));
}

#[test]
fn load_on_empty_array_returns_seed_set() {
    let slot = MemorySlot::with_payload("[]");
    let store = ItemStore::open(&slot);

    assert_eq!(store.len(), SEED_ITEM_COUNT);
    assert_eq!(store.load_source(), &LoadSource::Seed(SeedReason::Empty));
}

#[test]
fn load_on_corrupt_payload_returns_seed_set() {
    for payload in ["{not json", "\"text\"", r#"[{"id": 1}]"#, ""] {
        let slot = MemorySlot::with_payload(payload);
        let store = ItemStore::open(&slot);

        assert_eq!(store.items(), seed_items().as_slice(), "payload: {payload}");
        assert!(matches!(
            store.load_source(),
            LoadSource::Seed(SeedReason::Malformed(_))
        ));
    }
}

#[test]
fn load_on_unreadable_slot_returns_seed_set() {
    let store = ItemStore::open(BrokenSlot);
    assert_eq!(store.len(), SEED_ITEM_COUNT);
    assert!(matches!(
        store.load_source(),
        LoadSource::Seed(SeedReason::ReadFailed(_))
    ));
}

#[test]
fn load_returns_stored_array_exactly() {
    let payload = r#"[
        {"id": 42, "title": "Foro semanal", "type": "forum", "deadline": "2026-01-15",
         "description": "", "completed": false}
    ]"#;
    let slot = MemorySlot::with_payload(payload);
    let store = ItemStore::open(&slot);

    assert_eq!(store.load_source(), &LoadSource::Stored);
    assert_eq!(store.items(), decode_snapshot(payload).unwrap().as_slice());
}

#[test]
fn create_persists_and_survives_reload() {
    let conn = open_db_in_memory().unwrap();
    let created = {
        let mut store = ItemStore::open(SqliteSlot::new(&conn));
        store
            .create(fields("Laboratorio de Física").with_description("Informe"))
            .unwrap()
    };

    let store = ItemStore::open(SqliteSlot::new(&conn));
    assert_eq!(store.load_source(), &LoadSource::Stored);
    assert_eq!(store.len(), SEED_ITEM_COUNT + 1);
    assert_eq!(store.get(created.id), Some(&created));
}

#[test]
fn create_assigns_unique_ids_past_existing_ones() {
    let slot = MemorySlot::new();
    let mut store = ItemStore::open(&slot);

    let first = store.create(fields("a")).unwrap();
    let second = store.create(fields("b")).unwrap();
    assert_ne!(first.id, second.id);
    assert!(seed_items().iter().all(|item| item.id != first.id));

    store.delete(second.id);
    let third = store.create(fields("c")).unwrap();
    assert_ne!(third.id, second.id);

    let ids = store.items().iter().map(|item| item.id).collect::<HashSet<_>>();
    assert_eq!(ids.len(), store.len());
}

#[test]
fn create_keeps_ids_unique_when_stored_id_is_max() {
    let payload = format!(
        r#"[{{"id":{},"title":"Tope","type":"activity","deadline":"2025-11-20","description":"","completed":false}}]"#,
        i64::MAX
    );
    let slot = MemorySlot::with_payload(payload);
    let mut store = ItemStore::open(&slot);
    assert_eq!(store.load_source(), &LoadSource::Stored);

    let first = store.create(fields("a")).unwrap();
    let second = store.create(fields("b")).unwrap();
    assert_ne!(first.id, i64::MAX);
    assert_ne!(second.id, i64::MAX);
    assert_ne!(first.id, second.id);

    let ids = store.items().iter().map(|item| item.id).collect::<HashSet<_>>();
    assert_eq!(ids.len(), store.len());

    let reloaded = decode_snapshot(&slot.payload().unwrap()).unwrap();
    assert_eq!(reloaded.len(), 3);
}

#[test]
fn create_rejects_blank_title_without_mutation() {
    let slot = MemorySlot::new();
    let mut store = ItemStore::open(&slot);

    let err = store.create(fields("  ")).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ItemValidationError::MissingRequiredField(_))
    ));
    assert_eq!(store.len(), SEED_ITEM_COUNT);
    assert_eq!(slot.payload(), None);
}

#[test]
fn update_replaces_fields_and_keeps_id() {
    let slot = MemorySlot::new();
    let mut store = ItemStore::open(&slot);

    let updated = store
        .update(
            2,
            ItemFields::new("Examen final", ItemType::Evaluation, date(2025, 12, 10))
                .with_completed(true),
        )
        .unwrap();

    assert_eq!(updated.id, 2);
    assert_eq!(updated.title, "Examen final");
    assert_eq!(updated.description, "");
    assert_eq!(store.get(2), Some(&updated));

    let persisted = decode_snapshot(&slot.payload().unwrap()).unwrap();
    assert!(persisted.contains(&updated));
}

#[test]
fn update_unknown_id_returns_not_found() {
    let slot = MemorySlot::new();
    let mut store = ItemStore::open(&slot);

    let err = store.update(999, fields("x")).unwrap_err();
    assert_eq!(err, StoreError::NotFound(999));
    assert_eq!(slot.payload(), None);
}

#[test]
fn delete_is_idempotent_and_persists() {
    let slot = MemorySlot::new();
    let mut store = ItemStore::open(&slot);

    store.delete(1);
    store.delete(1);
    store.delete(12345);

    assert!(store.get(1).is_none());
    assert_eq!(store.len(), SEED_ITEM_COUNT - 1);
    let persisted = decode_snapshot(&slot.payload().unwrap()).unwrap();
    assert_eq!(persisted, store.items());
}

#[test]
fn toggle_complete_is_its_own_inverse() {
    let slot = MemorySlot::new();
    let mut store = ItemStore::open(&slot);
    let original = store.get(3).unwrap().completed;

    let once = store.toggle_complete(3).unwrap();
    assert_eq!(once.completed, !original);
    let twice = store.toggle_complete(3).unwrap();
    assert_eq!(twice.completed, original);

    assert_eq!(store.toggle_complete(77), Err(StoreError::NotFound(77)));
}

#[test]
fn clear_all_empties_store_and_slot() {
    let conn = open_db_in_memory().unwrap();
    let slot = SqliteSlot::new(&conn);
    let mut store = ItemStore::open(&slot);
    store.create(fields("a")).unwrap();

    store.clear_all();
    assert!(store.is_empty());
    assert_eq!(slot.read().unwrap(), None);

    let reloaded = ItemStore::open(&slot);
    assert_eq!(reloaded.items(), seed_items().as_slice());
}

#[test]
fn write_failure_keeps_in_memory_mutation() {
    let slot = FlakySlot {
        inner: MemorySlot::new(),
        failing: Cell::new(true),
    };
    let mut store = ItemStore::open(&slot);

    let created = store.create(fields("sin cuota")).unwrap();
    assert_eq!(store.get(created.id), Some(&created));
    assert!(matches!(
        store.take_write_error(),
        Some(PersistenceWriteError::Slot(SlotError::Unavailable(_)))
    ));
    assert!(store.take_write_error().is_none());

    slot.failing.set(false);
    store.toggle_complete(created.id).unwrap();
    assert!(store.take_write_error().is_none());
    let persisted = decode_snapshot(&slot.inner.payload().unwrap()).unwrap();
    assert_eq!(persisted, store.items());
}

#[test]
fn clear_all_failure_is_reported_but_memory_is_cleared() {
    let slot = FlakySlot {
        inner: MemorySlot::new(),
        failing: Cell::new(true),
    };
    let mut store = ItemStore::open(&slot);

    store.clear_all();
    assert!(store.is_empty());
    assert!(store.take_write_error().is_some());
}
