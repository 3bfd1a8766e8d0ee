//! Batch reader and batch writer.
//!
//! Each is a single retryable unit of engine work. A failed call fails the whole
//! batch; the retry policy resubmits the same batch, never a subset of it.

use crate::retry::Retryable;
use crate::storage_trait::{KvBatch, StorageBackend, StorageError};
use grigio_commons::ByteKey;
use std::collections::HashMap;

/// One multi-key lookup against the backend.
pub struct BatchReader<'a, B: ?Sized> {
    backend: &'a B,
    keys: &'a [ByteKey],
    result: Option<Vec<Option<Vec<u8>>>>,
}

impl<'a, B: StorageBackend + ?Sized> BatchReader<'a, B> {
    pub fn new(backend: &'a B, keys: &'a [ByteKey]) -> Self {
        Self {
            backend,
            keys,
            result: None,
        }
    }

    /// Raw lookup result, one slot per key, or `None` before a successful call.
    pub fn raw_result(&self) -> Option<&[Option<Vec<u8>>]> {
        self.result.as_deref()
    }

    /// Consumes the reader, returning the stored bytes of every key that exists.
    pub fn into_result(self) -> HashMap<ByteKey, Vec<u8>> {
        let Some(values) = self.result else {
            return HashMap::new();
        };

        self.keys
            .iter()
            .zip(values)
            .filter_map(|(key, value)| value.map(|bytes| (key.clone(), bytes)))
            .collect()
    }
}

impl<B: StorageBackend + ?Sized> Retryable for BatchReader<'_, B> {
    type Error = StorageError;

    fn call(&mut self) -> Result<(), StorageError> {
        let values = self.backend.multi_get(self.keys)?;
        if values.len() != self.keys.len() {
            return Err(StorageError::Other(format!(
                "multi_get returned {} values for {} keys",
                values.len(),
                self.keys.len()
            )));
        }
        self.result = Some(values);
        Ok(())
    }
}

/// One atomic batch write against the backend.
pub struct BatchWriter<'a, B: ?Sized> {
    backend: &'a B,
    batch: &'a KvBatch,
}

impl<'a, B: StorageBackend + ?Sized> BatchWriter<'a, B> {
    pub fn new(backend: &'a B, batch: &'a KvBatch) -> Self {
        Self { backend, batch }
    }
}

impl<B: StorageBackend + ?Sized> Retryable for BatchWriter<'_, B> {
    type Error = StorageError;

    fn call(&mut self) -> Result<(), StorageError> {
        self.backend.write_batch(self.batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::RetryPolicy;
    use crate::test_utils::{FlakyBackend, InMemoryBackend};
    use std::time::Duration;

    fn keys(names: &[&str]) -> Vec<ByteKey> {
        names.iter().map(|n| ByteKey::from(*n)).collect()
    }

    #[test]
    fn test_reader_single_engine_call() {
        let backend = InMemoryBackend::new();
        backend.insert_raw("a", b"1");

        let keys = keys(&["a", "b"]);
        let mut reader = BatchReader::new(&backend, &keys);
        reader.call().unwrap();

        assert_eq!(backend.multi_get_calls(), 1);
        assert_eq!(reader.raw_result().unwrap(), &[Some(b"1".to_vec()), None]);

        let result = reader.into_result();
        assert_eq!(result.len(), 1);
        assert_eq!(result.get(&ByteKey::from("a")), Some(&b"1".to_vec()));
    }

    #[test]
    fn test_reader_without_successful_call_is_empty() {
        let backend = InMemoryBackend::new();
        let keys = keys(&["a"]);
        let reader = BatchReader::new(&backend, &keys);
        assert!(reader.raw_result().is_none());
        assert!(reader.into_result().is_empty());
    }

    #[test]
    fn test_reader_retries_whole_batch() {
        let backend = FlakyBackend::new(InMemoryBackend::new()).fail_reads(2);
        backend.inner().insert_raw("a", b"1");
        backend.inner().insert_raw("b", b"2");

        let keys = keys(&["a", "b"]);
        let mut reader = BatchReader::new(&backend, &keys);
        RetryPolicy::fixed_delay(3, Duration::ZERO)
            .attempt(&mut reader)
            .unwrap();

        assert_eq!(backend.multi_get_calls(), 3);
        assert_eq!(backend.keys_requested(), vec![2, 2, 2]);
        assert_eq!(reader.into_result().len(), 2);
    }

    #[test]
    fn test_writer_retries_same_batch() {
        let backend = FlakyBackend::new(InMemoryBackend::new()).fail_writes(1);

        let mut batch = KvBatch::new();
        batch.put(ByteKey::from("k1"), b"v1".to_vec());
        batch.put(ByteKey::from("k2"), b"v2".to_vec());

        let mut writer = BatchWriter::new(&backend, &batch);
        RetryPolicy::fixed_delay(2, Duration::ZERO)
            .attempt(&mut writer)
            .unwrap();

        assert_eq!(backend.write_batch_calls(), 2);
        assert_eq!(backend.inner().get_raw("k1"), Some(b"v1".to_vec()));
        assert_eq!(backend.inner().get_raw("k2"), Some(b"v2".to_vec()));
    }

    #[test]
    fn test_writer_exhaustion_applies_nothing() {
        let backend = FlakyBackend::new(InMemoryBackend::new()).fail_writes(u32::MAX);

        let mut batch = KvBatch::new();
        batch.put(ByteKey::from("k1"), b"v1".to_vec());

        let mut writer = BatchWriter::new(&backend, &batch);
        let err = RetryPolicy::fixed_delay(3, Duration::ZERO)
            .attempt(&mut writer)
            .unwrap_err();

        assert_eq!(err.attempts(), 3);
        assert_eq!(backend.write_batch_calls(), 3);
        assert_eq!(backend.inner().get_raw("k1"), None);
    }
}
