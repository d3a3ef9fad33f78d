//! Linear substring filter over the note collection.
//!
//! # Responsibility
//! - Decide which notes are visible for a given search query.
//!
//! # Invariants
//! - Matching is case-insensitive on title and content.
//! - Insertion order of the input collection is preserved.
//! - A blank query keeps every note visible.

use crate::model::note::Note;

/// Returns the subsequence of `notes` whose title or content contains
/// `query` as a case-insensitive substring.
///
/// Pure and recomputed on demand; the result borrows from the input and is
/// never persisted.
pub fn filter_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    if query.is_empty() {
        return notes.iter().collect();
    }

    let needle = query.to_lowercase();
    notes
        .iter()
        .filter(|note| matches_needle(note, &needle))
        .collect()
}

fn matches_needle(note: &Note, needle: &str) -> bool {
    note.title.to_lowercase().contains(needle) || note.content.to_lowercase().contains(needle)
}
