//! Test utilities for grigio-store.
//!
//! Provides backends and table helpers for tests with minimal boilerplate.

use crate::storage_trait::{KvBatch, Result, StorageBackend, StorageError};
use crate::table::{KvTable, RocksDbKeyValueStoreTable};
use grigio_commons::{ByteKey, JsonCodec, ValueCodec};
use grigio_configs::TableSettings;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};
use tempfile::TempDir;

/// Ordered in-memory backend that counts engine calls.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    data: RwLock<BTreeMap<ByteKey, Vec<u8>>>,
    multi_get_calls: AtomicUsize,
    write_batch_calls: AtomicUsize,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores raw bytes directly, bypassing any codec.
    pub fn insert_raw(&self, key: impl Into<ByteKey>, value: &[u8]) {
        if let Ok(mut data) = self.data.write() {
            data.insert(key.into(), value.to_vec());
        }
    }

    pub fn get_raw(&self, key: impl Into<ByteKey>) -> Option<Vec<u8>> {
        let key = key.into();
        self.data.read().ok()?.get(&key).cloned()
    }

    pub fn len(&self) -> usize {
        self.data.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn multi_get_calls(&self) -> usize {
        self.multi_get_calls.load(Ordering::SeqCst)
    }

    pub fn write_batch_calls(&self) -> usize {
        self.write_batch_calls.load(Ordering::SeqCst)
    }
}

impl StorageBackend for InMemoryBackend {
    fn multi_get(&self, keys: &[ByteKey]) -> Result<Vec<Option<Vec<u8>>>> {
        self.multi_get_calls.fetch_add(1, Ordering::SeqCst);
        let data = self
            .data
            .read()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        Ok(keys.iter().map(|k| data.get(k).cloned()).collect())
    }

    fn write_batch(&self, batch: &KvBatch) -> Result<()> {
        self.write_batch_calls.fetch_add(1, Ordering::SeqCst);
        let mut data = self
            .data
            .write()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        for (key, value) in batch.iter() {
            data.insert(key.clone(), value.to_vec());
        }
        Ok(())
    }
}

/// Wraps a backend and fails the first N reads and/or writes.
///
/// Failed calls never reach the inner backend, so a failed write applies
/// nothing.
#[derive(Debug)]
pub struct FlakyBackend<B> {
    inner: B,
    failing_reads: usize,
    failing_writes: usize,
    multi_get_calls: AtomicUsize,
    write_batch_calls: AtomicUsize,
    keys_requested: Mutex<Vec<usize>>,
}

impl<B: StorageBackend> FlakyBackend<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            failing_reads: 0,
            failing_writes: 0,
            multi_get_calls: AtomicUsize::new(0),
            write_batch_calls: AtomicUsize::new(0),
            keys_requested: Mutex::new(Vec::new()),
        }
    }

    /// Fails the first `n` `multi_get` calls.
    pub fn fail_reads(mut self, n: u32) -> Self {
        self.failing_reads = n as usize;
        self
    }

    /// Fails the first `n` `write_batch` calls.
    pub fn fail_writes(mut self, n: u32) -> Self {
        self.failing_writes = n as usize;
        self
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// Number of `multi_get` calls, failed ones included.
    pub fn multi_get_calls(&self) -> usize {
        self.multi_get_calls.load(Ordering::SeqCst)
    }

    /// Number of `write_batch` calls, failed ones included.
    pub fn write_batch_calls(&self) -> usize {
        self.write_batch_calls.load(Ordering::SeqCst)
    }

    /// Key count of every `multi_get` call, in call order.
    pub fn keys_requested(&self) -> Vec<usize> {
        self.keys_requested
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default()
    }
}

impl<B: StorageBackend> StorageBackend for FlakyBackend<B> {
    fn multi_get(&self, keys: &[ByteKey]) -> Result<Vec<Option<Vec<u8>>>> {
        let call = self.multi_get_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut requested) = self.keys_requested.lock() {
            requested.push(keys.len());
        }
        if call <= self.failing_reads {
            return Err(StorageError::IoError(format!("injected read failure #{}", call)));
        }
        self.inner.multi_get(keys)
    }

    fn write_batch(&self, batch: &KvBatch) -> Result<()> {
        let call = self.write_batch_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.failing_writes {
            return Err(StorageError::IoError(format!("injected write failure #{}", call)));
        }
        self.inner.write_batch(batch)
    }
}

/// RocksDB table living in a temporary directory.
pub struct TestTable<V, C = JsonCodec<V>> {
    /// The table under test
    pub table: RocksDbKeyValueStoreTable<V, C>,
    /// Temporary directory (kept alive for the duration of the test)
    temp_dir: TempDir,
}

impl<V, C> TestTable<V, C>
where
    C: ValueCodec<V>,
{
    /// Opens a table at `<tempdir>/table` with the given settings and codec.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use grigio_commons::JsonCodec;
    /// use grigio_configs::TableSettings;
    /// use grigio_store::test_utils::TestTable;
    ///
    /// let test_table = TestTable::<String>::open_with(TableSettings::default(), JsonCodec::new()).unwrap();
    /// // Use test_table.table for testing...
    /// ```
    pub fn open_with(settings: TableSettings, codec: C) -> crate::Result<Self> {
        let temp_dir = TempDir::new().map_err(|e| crate::KvStoreError::Open {
            path: std::env::temp_dir(),
            source: StorageError::IoError(e.to_string()),
        })?;
        let table = KvTable::open(temp_dir.path().join("table"), &settings, codec)?;
        Ok(Self { table, temp_dir })
    }

    /// Directory holding the table and its backup.
    pub fn dir(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    /// Splits into the table and the directory guard.
    pub fn into_parts(self) -> (RocksDbKeyValueStoreTable<V, C>, TempDir) {
        (self.table, self.temp_dir)
    }
}

impl<V> TestTable<V, JsonCodec<V>>
where
    JsonCodec<V>: ValueCodec<V>,
{
    /// Opens a JSON-encoded table with default settings.
    pub fn new() -> crate::Result<Self> {
        Self::open_with(TableSettings::default(), JsonCodec::new())
    }
}
