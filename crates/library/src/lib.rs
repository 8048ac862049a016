//! Audiofolio library management.
//!
//! High-level orchestration layer that coordinates core, database, and player.
//! Owns the import pipeline (folder classification, metadata aggregation,
//! catalog replacement) and the catalog query surface the UI layer consumes.

pub mod error;
pub mod import;
pub mod manager;
pub mod metadata;
pub mod scanner;

pub use error::{LibraryError, Result};
pub use import::{ImportSummary, LibraryImporter};
pub use manager::{AuthorWithBooks, LibraryManager};
pub use metadata::{BookMetadata, FileMetadata, MetadataExtractor};
pub use scanner::{FolderClassifier, ScannerConfig};

use std::path::PathBuf;

/// Library configuration
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    /// Database file path
    pub database_path: String,
    /// Directory where extracted cover images are stored
    pub covers_dir: PathBuf,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            database_path: "audiofolio.db".to_string(),
            covers_dir: PathBuf::from("covers"),
        }
    }
}

impl LibraryConfig {
    pub fn new(database_path: impl Into<String>) -> Self {
        Self {
            database_path: database_path.into(),
            ..Default::default()
        }
    }

    pub fn with_covers_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.covers_dir = dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = LibraryConfig::default();
        assert_eq!(config.database_path, "audiofolio.db");
        assert_eq!(config.covers_dir, PathBuf::from("covers"));
    }

    #[test]
    fn test_config_builder() {
        let config = LibraryConfig::new("custom.db").with_covers_dir("/data/covers");
        assert_eq!(config.database_path, "custom.db");
        assert_eq!(config.covers_dir, PathBuf::from("/data/covers"));
    }
}
