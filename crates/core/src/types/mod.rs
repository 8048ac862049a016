//! Domain model types

pub mod author;
pub mod book;
pub mod common;
pub mod playback;
pub mod scan;

pub use author::{Author, AuthorId};
pub use book::{Book, BookId, Chapter, ChapterId};
pub use common::{Duration, Timestamp};
pub use playback::{PlaybackSpeed, SessionState};
pub use scan::{ScanResult, ScannedBook, ScannedChapter, UNKNOWN_AUTHOR};
