//! Intermediate descriptors produced by the folder scan and enriched by
//! metadata aggregation before the catalog replace.

use crate::types::common::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Sentinel author name for books whose subtree has no depth-0 author folder
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Mapping from author name to that author's scanned books.
///
/// Books keep their scan order within each author; author iteration order is
/// name order, which is also how the catalog presents them.
pub type ScanResult = BTreeMap<String, Vec<ScannedBook>>;

/// One chapter file found during the scan.
///
/// The classifier fills `title` (filename), `file_path`, and `position`;
/// metadata merge later overrides title/track/artist/album and sets the
/// duration when tags are readable. `position` is never re-derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannedChapter {
    pub title: String,
    pub file_path: PathBuf,
    pub position: u32,
    pub duration: Duration,
    pub track_number: Option<u32>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

impl ScannedChapter {
    pub fn new(title: impl Into<String>, file_path: PathBuf, position: u32) -> Self {
        Self {
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

/// One book leaf found during the scan: a directory holding chapter files.
///
/// The classifier fills `title` (folder name), `folder_path`, and `chapters`;
/// the consensus fields are filled by metadata aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannedBook {
    pub title: String,
    pub folder_path: PathBuf,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub total_duration: Duration,
    pub chapters: Vec<ScannedChapter>,
}

impl ScannedBook {
    pub fn new(title: impl Into<String>, folder_path: PathBuf, chapters: Vec<ScannedChapter>) -> Self {
        Self {
            title: title.into(),
            folder_path,
            artist: None,
            album: None,
            genre: None,
            year: None,
            total_duration: Duration::ZERO,
            chapters,
        }
    }
}
