//! Key-value storage collaborators.
//!
//! # Responsibility
//! - Define the minimal `get/set/remove` contract the board store needs.
//! - Provide an in-memory fake and a durable SQLite implementation.
//!
//! # Invariants
//! - Storage implementations report failures as `StorageError`; they never
//!   panic on quota, disabled or backend failures.
//! - Keys and values are opaque UTF-8 strings.

pub mod memory;
pub mod sqlite;

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure reported by a storage backend.
#[derive(Debug)]
pub enum StorageError {
    /// Backend is disabled or cannot be reached.
    Unavailable,
    /// Write would exceed the configured capacity.
    QuotaExceeded { needed: usize, limit: usize },
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage is unavailable"),
            Self::QuotaExceeded { needed, limit } => write!(
                f,
                "storage quota exceeded: need {needed} bytes, limit is {limit}"
            ),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "storage requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "storage requires table `{table}`")
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

/// Durable string key-value store used for board persistence.
pub trait KeyValueStorage {
    /// Reads one value. `Ok(None)` means the key is absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Writes one value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    /// Removes one key. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for &T {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}
