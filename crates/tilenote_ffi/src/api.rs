//! FFI use-case API for the native note-list view.
//!
//! # Responsibility
//! - Expose the note-list intents (add, delete, edit-start, edit-commit) and
//!   the query-change event as stable, use-case-level functions.
//! - Hold the single process-wide session behind a mutex so intents are
//!   handled to completion, persist step included, one at a time.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Return values are envelope structs with stable meaning.

use log::{error, info};
use std::sync::{Mutex, MutexGuard};
use tilenote_core::db::open_db;
use tilenote_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    FormState, NoteId, NoteListSession, NoteStore, SqliteKeyValueStore,
};

type Session = NoteListSession<SqliteKeyValueStore>;

/// One mutable collection instance and one dispatch point for the whole
/// process; the mutex is the mutual exclusion around every
/// load-mutate-save cycle.
static SESSION: Mutex<Option<Session>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One note as the view renders it inside a tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    /// Stable note ID in string form.
    pub id: String,
    pub title: String,
    pub content: String,
}

/// Snapshot of the visible list for a render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteListResponse {
    /// Whether the snapshot was produced.
    pub ok: bool,
    /// Visible notes after the current query filter, insertion order.
    pub items: Vec<NoteItem>,
    /// Whether the add/edit form is expanded.
    pub form_expanded: bool,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Generic action response envelope for the intent functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Created note ID, for the add intent.
    pub note_id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl NoteActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            note_id: None,
            message: message.into(),
        }
    }

    fn created(message: impl Into<String>, note_id: String) -> Self {
        Self {
            ok: true,
            note_id: Some(note_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            note_id: None,
            message: message.into(),
        }
    }
}

/// Draft prefill returned by the edit-start intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditStartResponse {
    /// Whether the edit target was found and recorded.
    pub ok: bool,
    /// Draft title to prefill into the form.
    pub title: String,
    /// Draft content to prefill into the form.
    pub content: String,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Opens (or replaces) the process-wide note session over a database file.
///
/// A corrupt persisted snapshot is reported through the envelope instead of
/// being silently replaced by an empty collection.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_open(db_path: String) -> NoteActionResponse {
    let session = open_db(&db_path)
        .map_err(|err| format!("notes_open failed: {err}"))
        .and_then(|conn| {
            SqliteKeyValueStore::try_new(conn)
                .map_err(|err| format!("notes_open failed: {err}"))
        })
        .and_then(|kv| {
            NoteListSession::open(NoteStore::new(kv))
                .map_err(|err| format!("notes_open failed: {err}"))
        });

    match session {
        Ok(session) => {
            info!(
                "event=session_open module=ffi status=ok count={}",
                session.notes().len()
            );
            *session_guard() = Some(session);
            NoteActionResponse::success("Notes opened.")
        }
        Err(message) => {
            error!("event=session_open module=ffi status=error error={message}");
            NoteActionResponse::failure(message)
        }
    }
}

/// Snapshot of the currently visible notes.
///
/// # FFI contract
/// - Sync call, in-memory execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_visible() -> NoteListResponse {
    with_session(|session| Ok(list_snapshot(session))).unwrap_or_else(empty_list_failure)
}

/// Updates the search query and returns the re-derived visible list.
///
/// # FFI contract
/// - Sync call, in-memory execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_set_query(query: String) -> NoteListResponse {
    with_session(|session| {
        session.set_search_query(query);
        Ok(list_snapshot(session))
    })
    .unwrap_or_else(empty_list_failure)
}

/// Expands the add form with an empty draft.
///
/// # FFI contract
/// - Sync call, in-memory execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_begin_compose() -> NoteActionResponse {
    with_session(|session| {
        session.begin_compose();
        Ok(NoteActionResponse::success("Compose started."))
    })
    .unwrap_or_else(|message| NoteActionResponse::failure(message))
}

/// Adds a note and persists the collection.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns the created note ID on success.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_add(title: String, content: String) -> NoteActionResponse {
    with_session(|session| {
        session
            .add_note(title, content)
            .map(|id| NoteActionResponse::created("Note added.", id.to_string()))
            .map_err(|err| format!("notes_add failed: {err}"))
    })
    .unwrap_or_else(|message| NoteActionResponse::failure(message))
}

/// Deletes the note with the given id and persists the collection.
///
/// An absent id succeeds without removing anything.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_delete(id: String) -> NoteActionResponse {
    with_session(|session| {
        session
            .delete_note(&NoteId::from(id))
            .map(|()| NoteActionResponse::success("Note deleted."))
            .map_err(|err| format!("notes_delete failed: {err}"))
    })
    .unwrap_or_else(|message| NoteActionResponse::failure(message))
}

/// Records the note as the edit target and returns the draft prefill.
///
/// # FFI contract
/// - Sync call, in-memory execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_begin_edit(id: String) -> EditStartResponse {
    let result = with_session(|session| {
        if !session.begin_edit(&NoteId::from(id.as_str())) {
            return Ok(EditStartResponse {
                ok: false,
                title: String::new(),
                content: String::new(),
                message: format!("note not found: {id}"),
            });
        }

        let draft = session.draft().cloned().unwrap_or_default();
        Ok(EditStartResponse {
            ok: true,
            title: draft.title,
            content: draft.content,
            message: "Edit started.".to_string(),
        })
    });

    result.unwrap_or_else(|message| EditStartResponse {
        ok: false,
        title: String::new(),
        content: String::new(),
        message,
    })
}

/// Replaces the draft title and content while the form is expanded.
///
/// # FFI contract
/// - Sync call, in-memory execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_update_draft(title: String, content: String) -> NoteActionResponse {
    with_session(|session| {
        session.set_draft_title(title);
        session.set_draft_content(content);
        Ok(NoteActionResponse::success("Draft updated."))
    })
    .unwrap_or_else(|message| NoteActionResponse::failure(message))
}

/// Commits the pending edit and persists the collection.
///
/// No-op when no edit target is set.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_commit_edit() -> NoteActionResponse {
    with_session(|session| {
        session
            .commit_edit()
            .map(|()| NoteActionResponse::success("Edit committed."))
            .map_err(|err| format!("notes_commit_edit failed: {err}"))
    })
    .unwrap_or_else(|message| NoteActionResponse::failure(message))
}

fn session_guard() -> MutexGuard<'static, Option<Session>> {
    SESSION
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn with_session<T>(f: impl FnOnce(&mut Session) -> Result<T, String>) -> Result<T, String> {
    let mut guard = session_guard();
    match guard.as_mut() {
        Some(session) => f(session),
        None => Err("notes session not opened; call notes_open first".to_string()),
    }
}

fn list_snapshot(session: &Session) -> NoteListResponse {
    let items = session
        .visible_notes()
        .into_iter()
        .map(|note| NoteItem {
            id: note.id.to_string(),
            title: note.title.clone(),
            content: note.content.clone(),
        })
        .collect::<Vec<_>>();
    let message = if items.is_empty() {
        "No notes.".to_string()
    } else {
        format!("{} note(s).", items.len())
    };

    NoteListResponse {
        ok: true,
        items,
        form_expanded: matches!(
            session.form(),
            FormState::Composing { .. } | FormState::Editing { .. }
        ),
        message,
    }
}

fn empty_list_failure(message: String) -> NoteListResponse {
    NoteListResponse {
        ok: false,
        items: Vec::new(),
        form_expanded: false,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, notes_add, notes_begin_compose, notes_begin_edit,
        notes_commit_edit, notes_delete, notes_open, notes_set_query, notes_update_draft,
        notes_visible, ping,
    };
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::time::{SystemTime, UNIX_EPOCH};

    // The session is process-global, so tests touching it must not overlap.
    static SESSION_TESTS: Mutex<()> = Mutex::new(());

    fn unique_db_path(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "tilenote-ffi-{suffix}-{}-{nanos}.sqlite3",
            std::process::id()
        ))
    }

    fn open_fresh(suffix: &str) -> PathBuf {
        let path = unique_db_path(suffix);
        let opened = notes_open(path.to_string_lossy().into_owned());
        assert!(opened.ok, "{}", opened.message);
        path
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn intents_fail_before_a_session_is_opened() {
        let _guard = SESSION_TESTS
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *super::session_guard() = None;

        let response = notes_add("A".to_string(), "a".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("notes_open"));

        let visible = notes_visible();
        assert!(!visible.ok);
        assert!(visible.items.is_empty());
    }

    #[test]
    fn open_reports_an_unreachable_database_path() {
        let _guard = SESSION_TESTS
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let opened = notes_open("/nonexistent-dir/definitely/missing.sqlite3".to_string());
        assert!(!opened.ok);
        assert!(opened.message.contains("notes_open failed"));
    }

    #[test]
    fn add_then_search_filters_the_visible_list() {
        let _guard = SESSION_TESTS
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        open_fresh("search");

        let added = notes_add("Milk".to_string(), "Buy milk".to_string());
        assert!(added.ok, "{}", added.message);
        let note_id = added.note_id.expect("add should return the new id");

        let visible = notes_set_query("milk".to_string());
        assert!(visible.ok);
        assert_eq!(visible.items.len(), 1);
        assert_eq!(visible.items[0].id, note_id);

        let none = notes_set_query("bread".to_string());
        assert!(none.items.is_empty());
    }

    #[test]
    fn edit_flow_updates_the_note_in_place() {
        let _guard = SESSION_TESTS
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let path = open_fresh("edit");

        let added = notes_add("Milk".to_string(), "Buy milk".to_string());
        let note_id = added.note_id.expect("add should return the new id");

        let started = notes_begin_edit(note_id.clone());
        assert!(started.ok, "{}", started.message);
        assert_eq!(started.title, "Milk");
        assert_eq!(started.content, "Buy milk");

        let drafted = notes_update_draft("Milk!".to_string(), "Buy oat milk".to_string());
        assert!(drafted.ok);
        let committed = notes_commit_edit();
        assert!(committed.ok, "{}", committed.message);

        // Re-open the same file: the edit survived the persist step.
        let reopened = notes_open(path.to_string_lossy().into_owned());
        assert!(reopened.ok, "{}", reopened.message);
        let visible = notes_set_query(String::new());
        assert_eq!(visible.items.len(), 1);
        assert_eq!(visible.items[0].id, note_id);
        assert_eq!(visible.items[0].title, "Milk!");
        assert_eq!(visible.items[0].content, "Buy oat milk");
    }

    #[test]
    fn delete_flow_removes_the_note_durably() {
        let _guard = SESSION_TESTS
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let path = open_fresh("delete");

        let first = notes_add("A".to_string(), "first".to_string());
        let second = notes_add("B".to_string(), "second".to_string());
        let first_id = first.note_id.expect("add should return the new id");
        let second_id = second.note_id.expect("add should return the new id");

        let deleted = notes_delete(first_id);
        assert!(deleted.ok, "{}", deleted.message);

        let reopened = notes_open(path.to_string_lossy().into_owned());
        assert!(reopened.ok, "{}", reopened.message);
        let visible = notes_visible();
        assert_eq!(visible.items.len(), 1);
        assert_eq!(visible.items[0].id, second_id);
    }

    #[test]
    fn compose_expands_the_form_flag() {
        let _guard = SESSION_TESTS
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        open_fresh("compose");

        assert!(!notes_visible().form_expanded);
        let compose = notes_begin_compose();
        assert!(compose.ok, "{}", compose.message);
        assert!(notes_visible().form_expanded);

        let added = notes_add("T".to_string(), "c".to_string());
        assert!(added.ok, "{}", added.message);
        assert!(!notes_visible().form_expanded);
    }
}
