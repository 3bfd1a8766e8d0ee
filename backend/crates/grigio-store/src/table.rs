//! Key-value tables.
//!
//! A table owns one storage backend, identified on disk by a directory path,
//! and exposes batched reads and writes of codec-encoded values:
//!
//! - `multi_get` runs one multi-key lookup under the read retry policy and
//!   drops (with a warning) any value that fails to decode.
//! - `multi_put` encodes every value up front, then writes them as one atomic
//!   batch under the write retry policy.
//! - `delete_table` consumes the table and moves its directory to
//!   `<path>.bak`, replacing any previous backup. `<path>.bak.old` is used as
//!   scratch space while the previous backup is swapped out.

use crate::batch::{BatchReader, BatchWriter};
use crate::error::{KvStoreError, Result, WriteFailure};
use crate::retry::RetryPolicy;
use crate::rocksdb_impl::RocksDBBackend;
use crate::storage_trait::{KvBatch, StorageBackend};
use grigio_commons::{ByteKey, JsonCodec, ValueCodec};
use grigio_configs::{RetrySettings, TableSettings};
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

const BACKUP_SUFFIX: &str = ".bak";
const STALE_BACKUP_SUFFIX: &str = ".bak.old";

/// Batched point reads and writes over one table.
pub trait KeyValueStoreTable<K, V> {
    /// Returns the decoded values of every key that exists and decodes.
    fn multi_get(&self, keys: &[K]) -> Result<HashMap<K, V>>;

    /// Writes all pairs atomically. An empty map is a no-op.
    fn multi_put(&self, pairs: &HashMap<K, V>) -> Result<()>;

    /// Deletes the table, keeping its last contents as a backup.
    ///
    /// The table directory is moved to `<path>.bak`. Both `<path>.bak` and
    /// `<path>.bak.old` are reserved: whatever sits at `<path>.bak.old` is
    /// removed, and a previous `<path>.bak` is replaced. Once the move has
    /// happened the call succeeds, even if the previous backup could not be
    /// cleaned up; the next deletion removes it.
    fn delete_table(self) -> Result<()>
    where
        Self: Sized;
}

/// Key-value table over a [`StorageBackend`] and a [`ValueCodec`].
pub struct KvTable<B, C, V> {
    path: PathBuf,
    backend: B,
    codec: C,
    read_retry: RetryPolicy,
    write_retry: RetryPolicy,
    _value: PhantomData<fn() -> V>,
}

/// RocksDB-backed table, JSON-encoded values by default.
pub type RocksDbKeyValueStoreTable<V, C = JsonCodec<V>> = KvTable<RocksDBBackend, C, V>;

impl<C, V> KvTable<RocksDBBackend, C, V>
where
    C: ValueCodec<V>,
{
    /// Opens the RocksDB table at `path`.
    pub fn open(path: impl AsRef<Path>, settings: &TableSettings, codec: C) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let backend = RocksDBBackend::open(&path, &settings.rocksdb).map_err(|source| {
            KvStoreError::Open {
                path: path.clone(),
                source,
            }
        })?;

        log::info!("Opened key-value table at {}", path.display());
        Ok(Self::with_backend(path, backend, codec, &settings.retry))
    }
}

impl<B, C, V> KvTable<B, C, V>
where
    B: StorageBackend,
    C: ValueCodec<V>,
{
    /// Builds a table over an already opened backend.
    pub fn with_backend(
        path: impl Into<PathBuf>,
        backend: B,
        codec: C,
        retry: &RetrySettings,
    ) -> Self {
        Self {
            path: path.into(),
            backend,
            codec,
            read_retry: RetryPolicy::from(&retry.read),
            write_retry: RetryPolicy::from(&retry.write),
            _value: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where `delete_table` leaves the table's former contents.
    pub fn backup_path(&self) -> PathBuf {
        with_suffix(&self.path, BACKUP_SUFFIX)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B, C, V> KeyValueStoreTable<ByteKey, V> for KvTable<B, C, V>
where
    B: StorageBackend,
    C: ValueCodec<V>,
{
    fn multi_get(&self, keys: &[ByteKey]) -> Result<HashMap<ByteKey, V>> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let mut reader = BatchReader::new(&self.backend, keys);
        self.read_retry
            .attempt(&mut reader)
            .map_err(|source| KvStoreError::Read {
                path: self.path.clone(),
                source,
            })?;

        let raw = reader.into_result();
        let mut result = HashMap::with_capacity(raw.len());
        for (key, bytes) in raw {
            match self.codec.decode(&bytes) {
                Some(value) => {
                    result.insert(key, value);
                }
                None => {
                    log::warn!(
                        "Failed to parse value in table {} for key {} ({} bytes), skipping",
                        self.path.display(),
                        key,
                        bytes.len()
                    );
                }
            }
        }

        log::debug!(
            "multi_get on {}: {} keys requested, {} returned",
            self.path.display(),
            keys.len(),
            result.len()
        );
        Ok(result)
    }

    fn multi_put(&self, pairs: &HashMap<ByteKey, V>) -> Result<()> {
        if pairs.is_empty() {
            return Ok(());
        }

        let mut batch = KvBatch::with_capacity(pairs.len());
        for (key, value) in pairs {
            let bytes = self.codec.encode(value).map_err(|e| KvStoreError::Write {
                path: self.path.clone(),
                source: WriteFailure::Encode(e),
            })?;
            batch.put(key.clone(), bytes);
        }

        let mut writer = BatchWriter::new(&self.backend, &batch);
        self.write_retry
            .attempt(&mut writer)
            .map_err(|e| KvStoreError::Write {
                path: self.path.clone(),
                source: WriteFailure::Exhausted(e),
            })?;

        log::debug!("multi_put on {}: {} pairs written", self.path.display(), batch.len());
        Ok(())
    }

    fn delete_table(self) -> Result<()> {
        let KvTable { path, backend, .. } = self;
        // Release the engine handle before its directory moves.
        drop(backend);

        let backup = with_suffix(&path, BACKUP_SUFFIX);
        let stale = with_suffix(&path, STALE_BACKUP_SUFFIX);

        // Leftover from an interrupted earlier deletion.
        remove_if_exists(&stale).map_err(|e| delete_error(&path, e))?;

        let had_backup = match fs::symlink_metadata(&backup) {
            Ok(_) => {
                fs::rename(&backup, &stale).map_err(|e| delete_error(&path, e))?;
                true
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => return Err(delete_error(&path, e)),
        };

        if let Err(e) = fs::rename(&path, &backup) {
            if had_backup {
                if let Err(restore) = fs::rename(&stale, &backup) {
                    log::error!(
                        "Failed to restore previous backup {} from {}: {}",
                        backup.display(),
                        stale.display(),
                        restore
                    );
                }
            }
            return Err(delete_error(&path, e));
        }

        if had_backup {
            discard_stale_backup(&stale);
        }

        log::info!(
            "Deleted table {}, contents kept at {}",
            path.display(),
            backup.display()
        );
        Ok(())
    }
}

fn delete_error(path: &Path, source: io::Error) -> KvStoreError {
    KvStoreError::Delete {
        path: path.to_path_buf(),
        source,
    }
}

/// Appends `suffix` to the final path component, ignoring a trailing separator.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let normalized: PathBuf = path.components().collect();
    let mut name = OsString::from(normalized.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Removes a replaced backup. The table has already moved, so failure is
/// only logged.
fn discard_stale_backup(stale: &Path) -> bool {
    match remove_if_exists(stale) {
        Ok(()) => true,
        Err(e) => {
            log::warn!(
                "Failed to remove replaced backup {}, it will be removed by the next deletion: {}",
                stale.display(),
                e
            );
            false
        }
    }
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
