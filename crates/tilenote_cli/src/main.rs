//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `tilenote_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use tilenote_core::db::open_db_in_memory;
use tilenote_core::{NoteListSession, NoteStore, SqliteKeyValueStore};

fn main() {
    println!("tilenote_core ping={}", tilenote_core::ping());
    println!("tilenote_core version={}", tilenote_core::core_version());

    // One in-memory add/search round exercises the whole store path without
    // touching any on-device database.
    match smoke_session() {
        Ok(visible) => println!("tilenote_core smoke visible_notes={visible}"),
        Err(err) => println!("tilenote_core smoke error={err}"),
    }
}

fn smoke_session() -> Result<usize, Box<dyn std::error::Error>> {
    let kv = SqliteKeyValueStore::try_new(open_db_in_memory()?)?;
    let mut session = NoteListSession::open(NoteStore::new(kv))?;
    session.add_note("Milk", "Buy milk")?;
    session.set_search_query("milk");
    Ok(session.visible_notes().len())
}
