//! Persistence layer: key-value contract and note snapshot storage.
//!
//! # Responsibility
//! - Define the on-device key-value access contract.
//! - Persist the full note collection as one serialized snapshot.
//!
//! # Invariants
//! - After a successful `save`, durable state equals the saved collection.
//! - Malformed persisted data surfaces as a recoverable error, never as a
//!   silently emptied collection.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod kv;
pub mod notes;

pub use kv::{KeyValueStore, SqliteKeyValueStore};
pub use notes::{NoteStore, NOTES_KEY};

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage error for key-value access and snapshot codec failures.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Connection has not been bootstrapped through migrations.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Connection schema lacks a table this layer requires.
    MissingRequiredTable(&'static str),
    /// Persisted snapshot exists but cannot be decoded.
    CorruptSnapshot {
        key: String,
        message: String,
    },
    /// In-memory collection cannot be encoded for persistence.
    EncodeSnapshot {
        key: String,
        message: String,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} has not reached expected version {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::CorruptSnapshot { key, message } => {
                write!(f, "corrupt snapshot under key `{key}`: {message}")
            }
            Self::EncodeSnapshot { key, message } => {
                write!(f, "cannot encode snapshot for key `{key}`: {message}")
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
