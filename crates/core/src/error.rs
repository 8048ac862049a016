//! Shared error type for Audiofolio crates.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the persistence and catalog layers.
///
/// Soft failures (unreadable directory nodes, corrupt tags, missing covers)
/// are not represented here; they degrade to absent values at the layer where
/// they occur. This enum covers the failures that do propagate.
#[derive(Error, Debug)]
pub enum AppError {
    /// Database operation failed
    #[error("Database error: {message}")]
    DatabaseError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Record not found in database
    #[error("Record not found: {entity} with {identifier}")]
    RecordNotFound { entity: String, identifier: String },

    /// Path is not usable as a catalog root or database location
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Wraps a database driver error with context
    pub fn database(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::DatabaseError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a not-found error for the given entity and identifier
    pub fn not_found(entity: impl Into<String>, identifier: impl ToString) -> Self {
        Self::RecordNotFound {
            entity: entity.into(),
            identifier: identifier.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
