//! Storage backend abstraction for key-value tables.
//!
//! A table only needs two things from its engine: a multi-key point lookup and
//! an atomic batch write. This module captures exactly that as the
//! `StorageBackend` trait so the table logic can run over RocksDB in
//! production and over in-memory or failure-injecting backends in tests.
//!
//! ## Example Usage
//!
//! ```rust
//! use grigio_commons::ByteKey;
//! use grigio_store::storage_trait::{KvBatch, StorageBackend};
//!
//! fn store_pair<S: StorageBackend>(backend: &S, key: &str, value: &[u8]) {
//!     let mut batch = KvBatch::new();
//!     batch.put(ByteKey::from(key), value.to_vec());
//!     backend.write_batch(&batch).expect("Failed to store");
//! }
//! ```

use grigio_commons::ByteKey;
use std::fmt;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Clone)]
pub enum StorageError {
    /// Generic I/O error from underlying storage
    IoError(String),

    /// Lock poisoning error (internal concurrency issue)
    LockPoisoned(String),

    /// Other errors
    Other(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::IoError(msg) => write!(f, "I/O error: {}", msg),
            StorageError::LockPoisoned(msg) => write!(f, "Lock poisoned: {}", msg),
            StorageError::Other(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rocksdb::Error> for StorageError {
    fn from(e: rocksdb::Error) -> Self {
        StorageError::IoError(e.into_string())
    }
}

/// An ordered set of puts applied to the engine as one atomic unit.
///
/// Once handed to a writer the batch is never mutated, so the same batch can be
/// submitted again after a failed attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KvBatch {
    entries: Vec<(ByteKey, Vec<u8>)>,
}

impl KvBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Appends a put. Later puts of the same key win when the batch is applied.
    pub fn put(&mut self, key: ByteKey, value: Vec<u8>) {
        self.entries.push((key, value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ByteKey, &[u8])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

/// Trait for pluggable storage backend implementations.
///
/// Implementations must be thread-safe (Send + Sync) to allow concurrent access.
///
/// ## Error Handling
///
/// Any error returned from either call is treated by callers as a failure of the
/// whole call. There are no partial results.
pub trait StorageBackend: Send + Sync {
    /// Looks up every key in one engine call.
    ///
    /// The returned vector has one slot per input key, in input order; absent
    /// keys yield `None`.
    fn multi_get(&self, keys: &[ByteKey]) -> Result<Vec<Option<Vec<u8>>>>;

    /// Applies every put in the batch atomically.
    ///
    /// Either all puts succeed or none are applied.
    fn write_batch(&self, batch: &KvBatch) -> Result<()>;
}

impl<B: StorageBackend + ?Sized> StorageBackend for std::sync::Arc<B> {
    fn multi_get(&self, keys: &[ByteKey]) -> Result<Vec<Option<Vec<u8>>>> {
        (**self).multi_get(keys)
    }

    fn write_batch(&self, batch: &KvBatch) -> Result<()> {
        (**self).write_batch(batch)
    }
}
