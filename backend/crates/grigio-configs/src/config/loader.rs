use super::types::TableSettings;
use std::fs;
use std::path::Path;

impl TableSettings {
    /// Load table settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&content)
    }

    /// Parse and validate table settings from TOML text
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let settings: TableSettings = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.retry.read.max_attempts == 0 {
            return Err(anyhow::anyhow!("retry.read.max_attempts must be at least 1"));
        }

        if self.retry.write.max_attempts == 0 {
            return Err(anyhow::anyhow!("retry.write.max_attempts must be at least 1"));
        }

        if self.rocksdb.write_buffer_size == 0 {
            return Err(anyhow::anyhow!("rocksdb.write_buffer_size cannot be 0"));
        }

        if self.rocksdb.max_write_buffers < 1 {
            return Err(anyhow::anyhow!(
                "rocksdb.max_write_buffers ({}) must be at least 1",
                self.rocksdb.max_write_buffers
            ));
        }

        if self.rocksdb.max_open_files == 0 || self.rocksdb.max_open_files < -1 {
            return Err(anyhow::anyhow!(
                "rocksdb.max_open_files ({}) must be positive or -1 for unlimited",
                self.rocksdb.max_open_files
            ));
        }

        Ok(())
    }
}
