use super::defaults::*;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// Configuration for one key-value table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableSettings {
    #[serde(default)]
    pub rocksdb: RocksDbSettings,
    #[serde(default)]
    pub retry: RetrySettings,
}

/// RocksDB settings handed to the engine at open, read and write time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RocksDbSettings {
    /// Create the database directory when it does not exist (default: true)
    #[serde(default = "default_rocksdb_create_if_missing")]
    pub create_if_missing: bool,

    /// Memtable size in bytes (default: 4MB)
    #[serde(default = "default_rocksdb_write_buffer_size")]
    pub write_buffer_size: usize,

    /// Maximum number of memtables (default: 2)
    #[serde(default = "default_rocksdb_max_write_buffers")]
    pub max_write_buffers: i32,

    /// LRU block cache size in bytes (default: 8MB)
    #[serde(default = "default_rocksdb_block_cache_size")]
    pub block_cache_size: usize,

    /// Maximum number of background flush/compaction jobs (default: 2)
    #[serde(default = "default_rocksdb_max_background_jobs")]
    pub max_background_jobs: i32,

    /// Maximum number of open files. Set to -1 for unlimited (default: 512)
    #[serde(default = "default_rocksdb_max_open_files")]
    pub max_open_files: i32,

    /// fsync the WAL on every batch write (default: false)
    #[serde(default = "default_rocksdb_sync_writes")]
    pub sync_writes: bool,

    /// Skip the WAL entirely (default: false)
    /// WARNING: acknowledged writes are lost on crash.
    #[serde(default)]
    pub disable_wal: bool,

    /// Verify block checksums on reads (default: true)
    #[serde(default = "default_rocksdb_verify_checksums")]
    pub verify_checksums: bool,

    /// Populate the block cache with blocks read by lookups (default: true)
    #[serde(default = "default_rocksdb_fill_cache")]
    pub fill_cache: bool,
}

impl Default for RocksDbSettings {
    fn default() -> Self {
        Self {
            create_if_missing: default_rocksdb_create_if_missing(),
            write_buffer_size: default_rocksdb_write_buffer_size(),
            max_write_buffers: default_rocksdb_max_write_buffers(),
            block_cache_size: default_rocksdb_block_cache_size(),
            max_background_jobs: default_rocksdb_max_background_jobs(),
            max_open_files: default_rocksdb_max_open_files(),
            sync_writes: default_rocksdb_sync_writes(),
            disable_wal: false,
            verify_checksums: default_rocksdb_verify_checksums(),
            fill_cache: default_rocksdb_fill_cache(),
        }
    }
}

/// Retry budgets for batch reads and batch writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Batch read retries (default: 3 attempts, 100ms apart)
    #[serde(
        default = "default_read_retry",
        deserialize_with = "deserialize_read_retry"
    )]
    pub read: RetryPolicySettings,

    /// Batch write retries (default: 5 attempts, 200ms apart)
    #[serde(
        default = "default_write_retry",
        deserialize_with = "deserialize_write_retry"
    )]
    pub write: RetryPolicySettings,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            read: default_read_retry(),
            write: default_write_retry(),
        }
    }
}

/// Bounded-attempt, fixed-delay retry configuration.
///
/// Fields left out of a `[retry.read]` or `[retry.write]` section take that
/// direction's default, not the other direction's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicySettings {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,

    /// Delay between attempts in milliseconds
    pub delay_ms: u64,
}

impl RetryPolicySettings {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// A retry section as written in TOML, before defaults are filled in.
#[derive(Debug, Default, Deserialize)]
struct PartialRetryPolicy {
    max_attempts: Option<u32>,
    delay_ms: Option<u64>,
}

impl PartialRetryPolicy {
    fn or(self, base: RetryPolicySettings) -> RetryPolicySettings {
        RetryPolicySettings {
            max_attempts: self.max_attempts.unwrap_or(base.max_attempts),
            delay_ms: self.delay_ms.unwrap_or(base.delay_ms),
        }
    }
}

fn deserialize_read_retry<'de, D>(deserializer: D) -> Result<RetryPolicySettings, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(PartialRetryPolicy::deserialize(deserializer)?.or(default_read_retry()))
}

fn deserialize_write_retry<'de, D>(deserializer: D) -> Result<RetryPolicySettings, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(PartialRetryPolicy::deserialize(deserializer)?.or(default_write_retry()))
}
