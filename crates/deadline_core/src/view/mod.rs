//! Read-only projections for calendar and list presentation.
//!
//! # Responsibility
//! - Derive day buckets, type filters, deadline order and progress from an
//!   item slice passed in explicitly.
//! - Compute month grid geometry for calendar layout.
//!
//! # Invariants
//! - Every function is pure; none touches the store or the slot.

pub mod calendar;
pub mod projection;
