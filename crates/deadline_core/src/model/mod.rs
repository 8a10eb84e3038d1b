//! Domain model for academic deadline items.
//!
//! # Responsibility
//! - Define the item record shared by calendar and list projections.
//! - Provide the fixed seed collection used on first start.
//!
//! # Invariants
//! - Every item is identified by a stable integer `ItemId`.
//! - Deletion is a hard remove from the collection; there are no tombstones.

pub mod item;
pub mod seed;
