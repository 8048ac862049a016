//! Folder classification: turns a nested directory tree into an
//! author → books → chapters mapping.
//!
//! Classification rules:
//! - Subdirectory names at depth 0 set the author context for their subtree;
//!   deeper levels inherit it unchanged.
//! - Any directory holding at least one audio file is a book leaf. A
//!   directory can be a book leaf and still have subdirectories that are
//!   recursed into.
//! - Chapters are the leaf's audio files in lexical filename order, with
//!   `position` equal to the sorted index.
//! - Unreadable directories are treated as empty; an invalid root yields an
//!   empty mapping, not an error.

use audiofolio_core::{ScanResult, ScannedBook, ScannedChapter, UNKNOWN_AUTHOR};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Supported audio file extensions
const SUPPORTED_EXTENSIONS: &[&str] = &[
    "mp3", "m4a", "m4b", "flac", "ogg", "opus", "aac", "wma", "wav", "aiff",
];

/// Configuration for folder classification
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Supported file extensions (defaults to common audio formats)
    pub supported_extensions: HashSet<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            supported_extensions: SUPPORTED_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScannerConfig {
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.supported_extensions = extensions
            .into_iter()
            .map(|e| e.to_lowercase())
            .collect();
        self
    }
}

/// Recursive directory classifier
#[derive(Debug, Default)]
pub struct FolderClassifier {
    config: ScannerConfig,
}

impl FolderClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// Classifies the tree under `root`.
    ///
    /// An unreadable or non-directory root signals "no catalog" by returning
    /// an empty mapping.
    pub fn classify(&self, root: &Path) -> ScanResult {
        let mut result = ScanResult::new();

        if !root.is_dir() {
            warn!("Scan root is not a readable directory: {}", root.display());
            return result;
        }

        self.visit(root, &mut result, None, 0);

        let book_count: usize = result.values().map(|books| books.len()).sum();
        info!(
            "Classified {}: {} authors, {} books",
            root.display(),
            result.len(),
            book_count
        );

        result
    }

    fn visit(&self, dir: &Path, result: &mut ScanResult, author: Option<&str>, depth: u32) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Skipping unreadable directory {}: {}", dir.display(), e);
                return;
            }
        };

        let mut audio_files: Vec<(String, PathBuf)> = Vec::new();
        let mut subdirs: Vec<(String, PathBuf)> = Vec::new();

        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let path = entry.path();

            let file_type = match entry.file_type() {
                Ok(ft) => ft,
                Err(_) => continue,
            };

            if file_type.is_dir() {
                subdirs.push((name, path));
            } else if file_type.is_file() && self.is_audio_file(&path) {
                audio_files.push((name, path));
            }
        }

        if !audio_files.is_empty() {
            audio_files.sort_by(|a, b| a.0.cmp(&b.0));

            let chapters = audio_files
                .into_iter()
                .enumerate()
                .map(|(index, (name, path))| ScannedChapter::new(name, path, index as u32))
                .collect();

            let title = dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Unknown".to_string());

            let author_name = author.unwrap_or(UNKNOWN_AUTHOR).to_string();
            result
                .entry(author_name)
                .or_default()
                .push(ScannedBook::new(title, dir.to_path_buf(), chapters));
        }

        // Deterministic traversal order
        subdirs.sort_by(|a, b| a.0.cmp(&b.0));

        for (name, path) in subdirs {
            let next_author = if depth == 0 { Some(name.as_str()) } else { author };
            self.visit(&path, result, next_author, depth + 1);
        }
    }

    fn is_audio_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.config.supported_extensions.contains(&e.to_lowercase()))
            .unwrap_or(false)
    }
}
