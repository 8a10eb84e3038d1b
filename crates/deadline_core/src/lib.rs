//! Core domain logic for the academic deadline calendar.
//! This crate is the single source of truth for item invariants; a
//! presentation layer reads projections and calls store mutators.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{
    format_deadline, parse_deadline, parse_item_type, Item, ItemFields, ItemId, ItemType,
    ItemValidationError, RequiredField,
};
pub use model::seed::{seed_items, SEED_ITEM_COUNT};
pub use repo::slot::{
    MemorySlot, PersistenceSlot, SlotError, SlotResult, SqliteSlot, DEFAULT_SLOT_KEY,
};
pub use repo::snapshot::{decode_snapshot, encode_snapshot, SnapshotError};
pub use service::form_staging::{
    begin, commit, CommitError, Draft, DraftField, FormSession, FormState,
};
pub use service::item_store::{
    load_snapshot, ItemStore, LoadSource, PersistenceWriteError, SeedReason, StoreError,
    StoreResult,
};
pub use view::calendar::{
    calendar_cells, month_grid, CalendarCell, CalendarDay, MonthCursor, MonthGrid,
    WEEKDAY_HEADERS,
};
pub use view::projection::{
    filtered_by_type, items_on_date, list_view, progress, sorted_by_deadline, Progress,
    TypeFilter,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
