//! Errors raised by history and profile stores.

#[cfg(feature = "store-sqlite")]
use std::path::PathBuf;

use thiserror::Error;

/// Failure inside a [`HistoryStore`](super::HistoryStore) or the storage
/// layer beneath a [`TasteProfileStore`](super::TasteProfileStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// A lock guarding per-user state was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
    /// Persisted data could not be interpreted.
    #[error("corrupt store data: {message}")]
    Corrupt {
        /// Description of the inconsistency.
        message: String,
    },
    /// Opening the SQLite database failed.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Generic SQLite error.
    #[cfg(feature = "store-sqlite")]
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
    /// A JSON column could not be encoded or decoded.
    #[cfg(feature = "serde")]
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Construct a [`StoreError::Corrupt`] from any displayable message.
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }
}

/// Failure raised by a [`TasteProfileStore`](super::TasteProfileStore).
#[derive(Debug, Error)]
pub enum ProfileStoreError {
    /// The stored version moved on since the caller read the profile.
    #[error("profile version conflict: expected {expected}, found {actual}")]
    Conflict {
        /// Version the caller read.
        expected: u64,
        /// Version currently stored; `0` when no profile exists.
        actual: u64,
    },
    /// The underlying storage failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
