use crate::retry::RetryError;
use crate::storage_trait::StorageError;
use grigio_commons::CodecError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for key-value table operations.
pub type Result<T> = std::result::Result<T, KvStoreError>;

/// Errors surfaced by key-value tables.
///
/// Every variant carries the table path and the underlying cause.
#[derive(Debug, Error)]
pub enum KvStoreError {
    #[error("failed to open key-value table {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: StorageError,
    },

    #[error("failed to get keys from table {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: RetryError<StorageError>,
    },

    #[error("failed to put data to table {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: WriteFailure,
    },

    #[error("failed to delete table {}", .path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl KvStoreError {
    /// Path of the table the failed operation ran against.
    pub fn path(&self) -> &Path {
        match self {
            KvStoreError::Open { path, .. }
            | KvStoreError::Read { path, .. }
            | KvStoreError::Write { path, .. }
            | KvStoreError::Delete { path, .. } => path,
        }
    }
}

/// Why a batch write failed.
#[derive(Debug, Error)]
pub enum WriteFailure {
    /// A value could not be encoded; nothing was sent to the engine.
    #[error(transparent)]
    Encode(#[from] CodecError),

    /// The engine rejected every attempt.
    #[error(transparent)]
    Exhausted(#[from] RetryError<StorageError>),
}
