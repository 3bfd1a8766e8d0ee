//! # grigio-store
//!
//! Key-value tables fronting an embedded RocksDB database.
//!
//! ## Architecture
//!
//! ```text
//! KeyValueStoreTable (multi_get / multi_put / delete_table)
//!     ↓
//! RetryPolicy ← BatchReader / BatchWriter (one engine call each)
//!     ↓
//! StorageBackend (RocksDB, or in-memory for tests)
//! ```
//!
//! Reads tolerate individual undecodable values: they are logged and left out
//! of the result. Engine failures are retried for the whole batch and surface
//! as a single table error once the retry budget is spent.

pub mod batch;
pub mod error;
pub mod retry;
pub mod rocksdb_impl;
pub mod rocksdb_init;
pub mod storage_trait;
pub mod table;
pub mod test_utils;

pub use batch::{BatchReader, BatchWriter};
pub use error::{KvStoreError, Result, WriteFailure};
pub use retry::{RetryError, RetryPolicy, Retryable};
pub use rocksdb_impl::RocksDBBackend;
pub use rocksdb_init::RocksDbInit;
pub use storage_trait::{KvBatch, StorageBackend, StorageError};
pub use table::{KeyValueStoreTable, KvTable, RocksDbKeyValueStoreTable};
