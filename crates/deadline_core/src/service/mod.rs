//! Core use-case services.
//!
//! # Responsibility
//! - Own the session item collection and its write-through persistence.
//! - Stage create/edit drafts and commit them into the store.
//!
//! # See also
//! - `crate::view` for read-only projections over the collection.

pub mod form_staging;
pub mod item_store;
