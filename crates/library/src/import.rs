//! The import pipeline: classify a folder tree, enrich it from audio tags,
//! replace the persisted catalog, then attach extracted covers.

use crate::error::Result;
use crate::metadata::MetadataExtractor;
use crate::scanner::FolderClassifier;
use audiofolio_core::ScanResult;
use audiofolio_database::{queries, replace_catalog, DbPool};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Outcome of an import run
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    pub authors_imported: usize,
    pub books_imported: usize,
    pub covers_attached: usize,
}

/// Runs the end-to-end import of an audiobook folder tree
pub struct LibraryImporter {
    pool: DbPool,
    covers_dir: PathBuf,
    classifier: FolderClassifier,
    extractor: MetadataExtractor,
}

impl LibraryImporter {
    pub fn new(pool: DbPool, covers_dir: impl Into<PathBuf>) -> Self {
        Self {
            pool,
            covers_dir: covers_dir.into(),
            classifier: FolderClassifier::new(),
            extractor: MetadataExtractor::new(),
        }
    }

    /// Imports the tree under `root`, replacing the entire catalog.
    ///
    /// An empty or unreadable root still replaces the catalog (with nothing),
    /// matching the folder tree being the source of truth. Cover attachment
    /// runs after the catalog transaction commits; a failed cover never rolls
    /// back the import.
    pub async fn import_folder(&self, root: &Path) -> Result<ImportSummary> {
        let mut scan = self.classifier.classify(root);
        self.enrich(&mut scan);

        let replacement = replace_catalog(&self.pool, &scan).await?;

        let mut covers_attached = 0;
        for imported in &replacement.books {
            let Some(first_chapter) = &imported.first_chapter else {
                continue;
            };

            match self
                .extractor
                .extract_cover(first_chapter, &imported.id, &self.covers_dir)
            {
                Ok(Some(cover_path)) => {
                    queries::books::update_cover(&self.pool, imported.id, &cover_path).await?;
                    covers_attached += 1;
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Cover extraction failed for '{}': {}", imported.title, e);
                }
            }
        }

        let summary = ImportSummary {
            authors_imported: scan.len(),
            books_imported: replacement.books_imported,
            covers_attached,
        };

        info!(
            "Imported {}: {} authors, {} books, {} covers",
            root.display(),
            summary.authors_imported,
            summary.books_imported,
            summary.covers_attached
        );

        Ok(summary)
    }

    fn enrich(&self, scan: &mut ScanResult) {
        for books in scan.values_mut() {
            for book in books {
                self.extractor.extract_book(book);
            }
        }
    }
}
