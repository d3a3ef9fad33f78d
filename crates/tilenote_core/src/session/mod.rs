//! Stateful list session mediating between store and view.
//!
//! # Responsibility
//! - Own the in-memory note collection, search query, and form state.
//! - Run every user intent to completion, persist step included.
//!
//! # Invariants
//! - There is exactly one mutable collection instance per session.
//! - The collection always equals the last successfully persisted snapshot.

pub mod note_list;
