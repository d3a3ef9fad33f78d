//! Note filtering entry points.
//!
//! # Responsibility
//! - Expose the case-insensitive substring filter backing the visible list.
//! - Keep result shaping (ordering, borrowing) inside core.

pub mod filter;
