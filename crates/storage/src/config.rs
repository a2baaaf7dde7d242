//! Storage path configuration.

use std::path::PathBuf;
use std::sync::Arc;

use crate::fallback::FallbackStore;
use crate::file::JsonFileStore;
use crate::sqlite::SqliteStore;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "STOCKROOM_DATA_DIR";

/// Resolved storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    /// Resolve the data directory: `STOCKROOM_DATA_DIR` if set, otherwise
    /// the platform data directory, otherwise the working directory.
    pub fn from_env() -> Self {
        let data_dir = std::env::var_os(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("stockroom")
            });
        Self { data_dir }
    }

    /// Path of the relational backend's database file.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("stockroom.db")
    }

    /// Directory of the JSON-file fallback.
    pub fn fallback_dir(&self) -> PathBuf {
        self.data_dir.join("fallback")
    }

    /// Open the default backend pair: SQLite primary, JSON-file fallback.
    pub fn open(&self) -> FallbackStore {
        FallbackStore::new(
            Arc::new(SqliteStore::new(self.db_path())),
            Arc::new(JsonFileStore::new(self.fallback_dir())),
        )
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
