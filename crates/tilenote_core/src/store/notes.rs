//! Note snapshot storage over the key-value contract.
//!
//! # Responsibility
//! - Load and save the full note collection as one JSON blob.
//! - Map codec failures to recoverable storage errors.
//!
//! # Invariants
//! - The whole collection is rewritten on every save; there are no partial
//!   writes observable through this API.
//! - `save(x)` followed by `load()` returns a collection equal to `x`.

use super::{KeyValueStore, StorageError, StorageResult};
use crate::model::note::Note;
use log::{error, info};

/// Fixed key the serialized note collection lives under.
pub const NOTES_KEY: &str = "notes";

/// Snapshot store for the note collection.
///
/// Generic over the key-value contract so tests can inject in-memory or
/// failure-injecting implementations.
pub struct NoteStore<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> NoteStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Reads the persisted collection.
    ///
    /// Returns an empty collection when nothing has been persisted yet.
    ///
    /// # Errors
    /// - `CorruptSnapshot` when the blob exists but cannot be decoded. The
    ///   error is propagated, not retried, so callers decide how to recover.
    pub fn load(&self) -> StorageResult<Vec<Note>> {
        let Some(raw) = self.kv.get(NOTES_KEY)? else {
            info!("event=notes_load module=store status=ok count=0 blob=absent");
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Note>>(&raw) {
            Ok(notes) => {
                info!(
                    "event=notes_load module=store status=ok count={}",
                    notes.len()
                );
                Ok(notes)
            }
            Err(err) => {
                error!("event=notes_load module=store status=error error={err}");
                Err(StorageError::CorruptSnapshot {
                    key: NOTES_KEY.to_string(),
                    message: err.to_string(),
                })
            }
        }
    }

    /// Serializes and overwrites the entire persisted collection.
    ///
    /// After success, durable state equals `notes` exactly.
    pub fn save(&self, notes: &[Note]) -> StorageResult<()> {
        let blob = serde_json::to_string(notes).map_err(|err| StorageError::EncodeSnapshot {
            key: NOTES_KEY.to_string(),
            message: err.to_string(),
        })?;

        match self.kv.set(NOTES_KEY, &blob) {
            Ok(()) => {
                info!(
                    "event=notes_save module=store status=ok count={}",
                    notes.len()
                );
                Ok(())
            }
            Err(err) => {
                error!("event=notes_save module=store status=error error={err}");
                Err(err)
            }
        }
    }
}
