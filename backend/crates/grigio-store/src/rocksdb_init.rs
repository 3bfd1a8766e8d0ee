//! RocksDB initialization utilities.
//!
//! Provides a thin helper to open a RocksDB instance configured from
//! `RocksDbSettings`.

use crate::storage_trait::Result;
use grigio_configs::RocksDbSettings;
use rocksdb::{BlockBasedOptions, Cache, Options, DB};
use std::path::{Path, PathBuf};

/// RocksDB initializer for creating/opening a table database.
pub struct RocksDbInit {
    db_path: PathBuf,
    settings: RocksDbSettings,
}

impl RocksDbInit {
    /// Create a new initializer for the given path with custom settings.
    pub fn new(db_path: impl Into<PathBuf>, settings: RocksDbSettings) -> Self {
        Self {
            db_path: db_path.into(),
            settings,
        }
    }

    /// Create a new initializer with default settings.
    pub fn with_defaults(db_path: impl Into<PathBuf>) -> Self {
        Self::new(db_path, RocksDbSettings::default())
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Open or create the RocksDB database.
    ///
    /// Fails if the directory is missing and `create_if_missing` is off, if the
    /// store is corrupt, or if another handle holds the database lock.
    pub fn open(&self) -> Result<DB> {
        let db_opts = self.db_options();
        let start = std::time::Instant::now();
        let db = DB::open(&db_opts, &self.db_path)?;
        log::debug!(
            "Opened RocksDB at {} in {:?}",
            self.db_path.display(),
            start.elapsed()
        );
        Ok(db)
    }

    fn db_options(&self) -> Options {
        let mut db_opts = Options::default();
        db_opts.create_if_missing(self.settings.create_if_missing);

        db_opts.set_write_buffer_size(self.settings.write_buffer_size);
        db_opts.set_max_write_buffer_number(self.settings.max_write_buffers);
        db_opts.set_max_background_jobs(self.settings.max_background_jobs);
        db_opts.set_max_open_files(self.settings.max_open_files);

        let cache = Cache::new_lru_cache(self.settings.block_cache_size);
        db_opts.set_block_based_table_factory(&create_block_options_with_cache(&cache));
        db_opts
    }
}

pub(crate) fn create_block_options_with_cache(cache: &Cache) -> BlockBasedOptions {
    let mut block_opts = BlockBasedOptions::default();
    block_opts.set_block_cache(cache);
    // Every table read is a point lookup.
    block_opts.set_bloom_filter(10.0, false);
    block_opts.set_cache_index_and_filter_blocks(true);
    block_opts.set_whole_key_filtering(true);
    block_opts
}
