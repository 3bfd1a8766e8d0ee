//! RocksDB implementation of the StorageBackend trait.
//!
//! One backend owns one database handle. Read and write options are derived
//! from the `RocksDbSettings` the database was opened with and passed to the
//! engine as-is.

use crate::rocksdb_init::RocksDbInit;
use crate::storage_trait::{KvBatch, Result, StorageBackend, StorageError};
use grigio_commons::ByteKey;
use grigio_configs::RocksDbSettings;
use rocksdb::{ReadOptions, WriteBatch, WriteOptions, DB};
use std::path::{Path, PathBuf};

/// RocksDB implementation of the StorageBackend trait.
///
/// ## Example
///
/// ```rust,ignore
/// use grigio_store::{RocksDBBackend, StorageBackend, KvBatch};
/// use grigio_configs::RocksDbSettings;
///
/// let backend = RocksDBBackend::open("/tmp/test.db", &RocksDbSettings::default()).unwrap();
///
/// let mut batch = KvBatch::new();
/// batch.put("key1".into(), b"value1".to_vec());
/// backend.write_batch(&batch).unwrap();
///
/// let values = backend.multi_get(&["key1".into()]).unwrap();
/// assert_eq!(values, vec![Some(b"value1".to_vec())]);
/// ```
pub struct RocksDBBackend {
    db: DB,
    path: PathBuf,
    settings: RocksDbSettings,
}

impl RocksDBBackend {
    /// Opens (or creates) the database at `path`.
    pub fn open(path: impl AsRef<Path>, settings: &RocksDbSettings) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let db = RocksDbInit::new(path.clone(), settings.clone()).open()?;
        Ok(Self {
            db,
            path,
            settings: settings.clone(),
        })
    }

    /// Returns a reference to the underlying database.
    pub fn db(&self) -> &DB {
        &self.db
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_options(&self) -> ReadOptions {
        let mut opts = ReadOptions::default();
        opts.set_verify_checksums(self.settings.verify_checksums);
        opts.fill_cache(self.settings.fill_cache);
        opts
    }

    fn write_options(&self) -> WriteOptions {
        let mut opts = WriteOptions::default();
        opts.set_sync(self.settings.sync_writes);
        opts.disable_wal(self.settings.disable_wal);
        opts
    }
}

impl StorageBackend for RocksDBBackend {
    fn multi_get(&self, keys: &[ByteKey]) -> Result<Vec<Option<Vec<u8>>>> {
        self.db
            .multi_get_opt(keys.iter(), &self.read_options())
            .into_iter()
            .map(|slot| slot.map_err(StorageError::from))
            .collect()
    }

    fn write_batch(&self, batch: &KvBatch) -> Result<()> {
        let mut wb = WriteBatch::default();
        for (key, value) in batch.iter() {
            wb.put(key, value);
        }

        self.db
            .write_opt(wb, &self.write_options())
            .map_err(StorageError::from)
    }
}

impl std::fmt::Debug for RocksDBBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RocksDBBackend")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_backend() -> (RocksDBBackend, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let backend = RocksDBBackend::open(temp_dir.path(), &RocksDbSettings::default()).unwrap();
        (backend, temp_dir)
    }

    #[test]
    fn test_write_and_multi_get() {
        let (backend, _temp) = create_test_backend();

        let mut batch = KvBatch::new();
        batch.put(ByteKey::from("key1"), b"value1".to_vec());
        batch.put(ByteKey::from("key2"), b"value2".to_vec());
        backend.write_batch(&batch).unwrap();

        let values = backend
            .multi_get(&[ByteKey::from("key2"), ByteKey::from("key1")])
            .unwrap();
        assert_eq!(values, vec![Some(b"value2".to_vec()), Some(b"value1".to_vec())]);
    }

    #[test]
    fn test_multi_get_keeps_gaps_for_absent_keys() {
        let (backend, _temp) = create_test_backend();

        let mut batch = KvBatch::new();
        batch.put(ByteKey::from("present"), b"v".to_vec());
        backend.write_batch(&batch).unwrap();

        let values = backend
            .multi_get(&[
                ByteKey::from("missing"),
                ByteKey::from("present"),
                ByteKey::from("also-missing"),
            ])
            .unwrap();
        assert_eq!(values, vec![None, Some(b"v".to_vec()), None]);
    }

    #[test]
    fn test_later_put_in_batch_wins() {
        let (backend, _temp) = create_test_backend();

        let mut batch = KvBatch::new();
        batch.put(ByteKey::from("k"), b"first".to_vec());
        batch.put(ByteKey::from("k"), b"second".to_vec());
        backend.write_batch(&batch).unwrap();

        assert_eq!(
            backend.multi_get(&[ByteKey::from("k")]).unwrap(),
            vec![Some(b"second".to_vec())]
        );
    }

    #[test]
    fn test_batch_can_be_replayed() {
        let (backend, _temp) = create_test_backend();

        let mut batch = KvBatch::new();
        batch.put(ByteKey::from("k"), b"v".to_vec());
        backend.write_batch(&batch).unwrap();
        backend.write_batch(&batch).unwrap();

        assert_eq!(
            backend.multi_get(&[ByteKey::from("k")]).unwrap(),
            vec![Some(b"v".to_vec())]
        );
    }

    #[test]
    fn test_sync_writes_setting() {
        let temp_dir = TempDir::new().unwrap();
        let settings = RocksDbSettings {
            sync_writes: true,
            ..RocksDbSettings::default()
        };
        let backend = RocksDBBackend::open(temp_dir.path(), &settings).unwrap();

        let mut batch = KvBatch::new();
        batch.put(ByteKey::from("durable"), b"yes".to_vec());
        backend.write_batch(&batch).unwrap();
        drop(backend);

        let reopened = RocksDBBackend::open(temp_dir.path(), &settings).unwrap();
        assert_eq!(
            reopened.multi_get(&[ByteKey::from("durable")]).unwrap(),
            vec![Some(b"yes".to_vec())]
        );
        assert_eq!(reopened.path(), temp_dir.path());
    }
}
