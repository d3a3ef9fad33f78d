//! Domain model for the note list.
//!
//! # Responsibility
//! - Define the canonical note record and its stable identifier.
//!
//! # Invariants
//! - Every note is identified by a `NoteId` that never changes after creation.
//! - Deletion is a hard removal from the collection; there are no tombstones.

pub mod note;
