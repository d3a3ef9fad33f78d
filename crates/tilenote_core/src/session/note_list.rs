//! Note list session: collection, query, and form state.
//!
//! # Responsibility
//! - Apply the add/delete/edit intents and persist after each mutation.
//! - Derive the visible list from the current search query.
//!
//! # Invariants
//! - `notes` always equals the last successfully persisted snapshot; a
//!   failed persist leaves both collection and form state untouched.
//! - Note ids and positions survive edits; only title and content change.

use crate::model::note::{Note, NoteId};
use crate::search::filter::filter_notes;
use crate::store::{KeyValueStore, NoteStore, StorageResult};

/// Transient title/content pair held while composing or editing.
///
/// Never persisted; cleared when the owning form transition completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub content: String,
}

/// Add/edit form state machine.
///
/// `Idle` is collapsed with no draft; the other two states are expanded.
/// Commit transitions pass through a persist step and only finalize when the
/// write succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Composing { draft: Draft },
    Editing { target: NoteId, draft: Draft },
}

impl FormState {
    /// Whether the add/edit form is expanded.
    pub fn is_expanded(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Stateful mediator between the snapshot store and the view layer.
///
/// Owns the only mutable collection instance at runtime; the durable copy is
/// owned by the injected [`NoteStore`].
pub struct NoteListSession<S: KeyValueStore> {
    store: NoteStore<S>,
    notes: Vec<Note>,
    query: String,
    form: FormState,
}

impl<S: KeyValueStore> NoteListSession<S> {
    /// Opens a session over the given store, loading the persisted
    /// collection.
    ///
    /// # Errors
    /// - Propagates `CorruptSnapshot` and other storage errors from the
    ///   initial load instead of degrading to an empty collection.
    pub fn open(store: NoteStore<S>) -> StorageResult<Self> {
        let notes = store.load()?;
        Ok(Self {
            store,
            notes,
            query: String::new(),
            form: FormState::Idle,
        })
    }

    /// Full in-memory collection in insertion order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn search_query(&self) -> &str {
        &self.query
    }

    /// Updates the search query; the visible list is re-derived on demand.
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Notes whose title or content contains the query case-insensitively.
    ///
    /// The full collection when the query is empty. Pure and recomputed on
    /// every call.
    pub fn visible_notes(&self) -> Vec<&Note> {
        filter_notes(&self.notes, &self.query)
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Whether the add/edit form is currently expanded.
    pub fn is_form_expanded(&self) -> bool {
        self.form.is_expanded()
    }

    /// Current draft, when composing or editing.
    pub fn draft(&self) -> Option<&Draft> {
        match &self.form {
            FormState::Idle => None,
            FormState::Composing { draft } | FormState::Editing { draft, .. } => Some(draft),
        }
    }

    /// Expands the form for a new note with an empty draft.
    pub fn begin_compose(&mut self) {
        self.form = FormState::Composing {
            draft: Draft::default(),
        };
    }

    /// Expands the form pre-filled from the note with the given id and
    /// records it as the edit target.
    ///
    /// Returns `false` without changing state when the id is not in the
    /// collection.
    pub fn begin_edit(&mut self, id: &NoteId) -> bool {
        let Some(note) = self.notes.iter().find(|note| note.id == *id) else {
            return false;
        };

        self.form = FormState::Editing {
            target: note.id.clone(),
            draft: Draft {
                title: note.title.clone(),
                content: note.content.clone(),
            },
        };
        true
    }

    /// Replaces the draft title while composing or editing; no-op otherwise.
    pub fn set_draft_title(&mut self, title: impl Into<String>) {
        if let FormState::Composing { draft } | FormState::Editing { draft, .. } = &mut self.form {
            draft.title = title.into();
        }
    }

    /// Replaces the draft content while composing or editing; no-op
    /// otherwise.
    pub fn set_draft_content(&mut self, content: impl Into<String>) {
        if let FormState::Composing { draft } | FormState::Editing { draft, .. } = &mut self.form {
            draft.content = content.into();
        }
    }

    /// Appends a note with a fresh id and persists the collection.
    ///
    /// On success the draft is cleared and the form collapses. Empty title
    /// and content are accepted. On persist failure nothing changes and the
    /// error is surfaced.
    pub fn add_note(
        &mut self,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> StorageResult<NoteId> {
        let note = Note::new(title, content);
        let id = note.id.clone();

        let mut next = self.notes.clone();
        next.push(note);
        self.store.save(&next)?;

        self.notes = next;
        self.form = FormState::Idle;
        Ok(id)
    }

    /// Removes the note with the given id (at most one) and persists.
    ///
    /// An absent id is not an error; the collection is persisted as-is in
    /// that case, and the relative order of the remaining notes never
    /// changes.
    pub fn delete_note(&mut self, id: &NoteId) -> StorageResult<()> {
        let mut next = self.notes.clone();
        if let Some(index) = next.iter().position(|note| note.id == *id) {
            next.remove(index);
        }
        self.store.save(&next)?;

        self.notes = next;
        Ok(())
    }

    /// Applies the draft to the edit target in place and persists.
    ///
    /// The target keeps its id and position. No-op when no edit target is
    /// set. A target that has vanished from the collection commits the
    /// collection unchanged and still collapses the form. On persist failure
    /// the edit state is kept so the intent can be retried.
    pub fn commit_edit(&mut self) -> StorageResult<()> {
        let FormState::Editing { target, draft } = &self.form else {
            return Ok(());
        };

        let mut next = self.notes.clone();
        if let Some(note) = next.iter_mut().find(|note| note.id == *target) {
            note.title = draft.title.clone();
            note.content = draft.content.clone();
        }
        self.store.save(&next)?;

        self.notes = next;
        self.form = FormState::Idle;
        Ok(())
    }
}
