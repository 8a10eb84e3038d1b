//! Repository layer: the persistence slot and its payload codec.
//!
//! # Responsibility
//! - Define the durable key-value slot contract.
//! - Isolate SQLite and JSON details from the item store.
//!
//! # Invariants
//! - Decoded snapshots satisfy `Item::validate()` and id uniqueness.

pub mod slot;
pub mod snapshot;
