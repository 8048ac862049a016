//! Core domain types for Audiofolio.
//!
//! Shared by the database, library, and player crates. No I/O happens here.

pub mod error;
pub mod types;

pub use error::{AppError, Result};
pub use types::{
    Author, AuthorId, Book, BookId, Chapter, ChapterId, Duration, PlaybackSpeed, ScanResult,
    ScannedBook, ScannedChapter, SessionState, Timestamp, UNKNOWN_AUTHOR,
};
