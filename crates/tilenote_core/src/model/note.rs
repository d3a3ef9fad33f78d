//! Note domain model.
//!
//! # Responsibility
//! - Define the note record persisted in the snapshot blob.
//! - Issue time-derived identifiers that stay unique within a process.
//!
//! # Invariants
//! - `id` is immutable once assigned and unique within a collection.
//! - Only `title` and `content` may change after creation.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Last identifier value handed out by [`NoteId::generate`].
///
/// Bumping past this value guarantees uniqueness even when several notes are
/// created within the same millisecond.
static LAST_ISSUED_MS: AtomicI64 = AtomicI64::new(0);

/// Stable identifier for a note.
///
/// Derived from the Unix-epoch millisecond timestamp at creation and stored
/// as its decimal string form, which is also how it serializes into the
/// snapshot blob.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Issues a fresh identifier from the current wall clock.
    ///
    /// # Invariants
    /// - Issued values are strictly increasing within one process, so two
    ///   calls never return the same identifier.
    pub fn generate() -> Self {
        Self(next_issued_ms().to_string())
    }

    /// Returns the identifier as its string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NoteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A user-authored title/content pair with a stable identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Stable ID used for delete/edit targeting.
    pub id: NoteId,
    pub title: String,
    pub content: String,
}

impl Note {
    /// Creates a note with a freshly generated identifier.
    ///
    /// Empty `title` and `content` are accepted; the collection imposes no
    /// field validation.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_id(NoteId::generate(), title, content)
    }

    /// Creates a note with a caller-provided identifier.
    ///
    /// Used by snapshot decoding and tests where identity already exists.
    pub fn with_id(id: NoteId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
        }
    }
}

fn next_issued_ms() -> i64 {
    let now = epoch_ms();
    let mut last = LAST_ISSUED_MS.load(Ordering::SeqCst);
    loop {
        let candidate = now.max(last + 1);
        match LAST_ISSUED_MS.compare_exchange(last, candidate, Ordering::SeqCst, Ordering::SeqCst) {
            Ok(_) => return candidate,
            Err(observed) => last = observed,
        }
    }
}

fn epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
