//! Book and chapter domain models

use crate::types::author::AuthorId;
use crate::types::common::{Duration, Timestamp};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Unique identifier for a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookId(Uuid);

impl BookId {
    /// Creates a new random BookId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a BookId from a UUID string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Returns the BookId as a string
    pub fn as_string(&self) -> String {
        self.0.to_string()
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a chapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChapterId(Uuid);

impl ChapterId {
    /// Creates a new random ChapterId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a ChapterId from a UUID string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Returns the ChapterId as a string
    pub fn as_string(&self) -> String {
        self.0.to_string()
    }
}

impl Default for ChapterId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ChapterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A complete audiobook: one folder of chapter files plus its resume state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    /// Folder the book was scanned from
    pub folder_path: PathBuf,
    pub author_id: AuthorId,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub cover_path: Option<PathBuf>,
    /// Sum of all chapter durations
    pub total_duration: Duration,
    pub current_chapter_index: u32,
    /// Offset within the current chapter
    pub current_position: Duration,
    pub playback_speed: f32,
    /// Absolute end time of a pending sleep timer, if one was set
    pub sleep_timer_end: Option<Timestamp>,
    pub is_finished: bool,
    pub added_date: Timestamp,
    pub last_played: Option<Timestamp>,
}

impl Book {
    /// Creates a new book with resume state at the beginning
    pub fn new(title: impl Into<String>, folder_path: PathBuf, author_id: AuthorId) -> Self {
        Self {
            id: BookId::new(),
            title: title.into(),
            folder_path,
            author_id,
            artist: None,
            album: None,
            genre: None,
            year: None,
            cover_path: None,
            total_duration: Duration::ZERO,
            current_chapter_index: 0,
            current_position: Duration::ZERO,
            playback_speed: 1.0,
            sleep_timer_end: None,
            is_finished: false,
            added_date: Timestamp::now(),
            last_played: None,
        }
    }

    /// Listening progress in `[0.0, 1.0]`, 0 when the total duration is unknown
    pub fn progress(&self) -> f32 {
        if self.total_duration.is_zero() {
            return 0.0;
        }
        let ratio =
            self.current_position.as_millis() as f64 / self.total_duration.as_millis() as f64;
        ratio.clamp(0.0, 1.0) as f32
    }

    /// Returns true if the book has a saved listening position
    pub fn has_progress(&self) -> bool {
        !self.current_position.is_zero() && !self.is_finished
    }
}

/// A chapter within an audiobook. `position` is the dense zero-based playback
/// order, fixed at import time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub id: ChapterId,
    pub book_id: BookId,
    pub title: String,
    pub file_path: PathBuf,
    pub position: u32,
    pub duration: Duration,
    pub track_number: Option<u32>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

impl Chapter {
    pub fn new(book_id: BookId, title: impl Into<String>, file_path: PathBuf, position: u32) -> Self {
        Self {
            id: ChapterId::new(),
            book_id,
            title: title.into(),
            file_path,
            position,
            duration: Duration::ZERO,
            track_number: None,
            artist: None,
            album: None,
        }
    }
}
