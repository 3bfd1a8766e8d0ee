// RocksDB defaults
pub fn default_rocksdb_create_if_missing() -> bool {
    true
}

pub fn default_rocksdb_write_buffer_size() -> usize {
    4 * 1024 * 1024 // 4MB, one table per database so no per-CF multiplication
}

pub fn default_rocksdb_max_write_buffers() -> i32 {
    2
}

pub fn default_rocksdb_block_cache_size() -> usize {
    8 * 1024 * 1024 // 8MB
}

pub fn default_rocksdb_max_background_jobs() -> i32 {
    2
}

pub fn default_rocksdb_max_open_files() -> i32 {
    512 // Reasonable default that stays under typical OS limits
}

pub fn default_rocksdb_sync_writes() -> bool {
    false
}

pub fn default_rocksdb_verify_checksums() -> bool {
    true
}

pub fn default_rocksdb_fill_cache() -> bool {
    true
}

// Retry defaults
pub fn default_read_max_attempts() -> u32 {
    3
}

pub fn default_read_retry_delay_ms() -> u64 {
    100
}

pub fn default_write_max_attempts() -> u32 {
    5
}

pub fn default_write_retry_delay_ms() -> u64 {
    200
}

pub fn default_read_retry() -> super::types::RetryPolicySettings {
    super::types::RetryPolicySettings {
        max_attempts: default_read_max_attempts(),
        delay_ms: default_read_retry_delay_ms(),
    }
}

pub fn default_write_retry() -> super::types::RetryPolicySettings {
    super::types::RetryPolicySettings {
        max_attempts: default_write_max_attempts(),
        delay_ms: default_write_retry_delay_ms(),
    }
}
