//! SQLite storage bootstrap for the persistence slot table.
//!
//! # Responsibility
//! - Open and configure SQLite connections backing `SqliteSlot`.
//! - Apply schema migrations in deterministic order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Slots must not be read or written before migrations succeed.
//! - Failures surface as `SlotError`, the same type slot reads and writes use.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
