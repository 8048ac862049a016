//! Persistence seam for session state.
//!
//! The session engine checkpoints progress, speed, and sleep timer state
//! through this trait; the library layer implements it against the catalog
//! database.

use crate::error::Result;
use async_trait::async_trait;
use audiofolio_core::{BookId, Duration, Timestamp};

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Records the listening position. Also bumps the book's last-played time.
    async fn save_progress(
        &self,
        book_id: BookId,
        chapter_index: u32,
        position: Duration,
    ) -> Result<()>;

    async fn save_speed(&self, book_id: BookId, speed: f32) -> Result<()>;

    /// Persists the sleep timer end, or clears it when `end` is None
    async fn save_sleep_timer(&self, book_id: BookId, end: Option<Timestamp>) -> Result<()>;

    /// Marks the book finished and resets its progress to the beginning
    async fn mark_finished(&self, book_id: BookId) -> Result<()>;
}
