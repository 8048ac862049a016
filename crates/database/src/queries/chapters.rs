//! Chapter database operations

use crate::DbPool;
use audiofolio_core::{AppError, BookId, Chapter, ChapterId, Duration};
use std::path::PathBuf;

/// Gets all chapters for a book in playback order
pub async fn get_book_chapters(pool: &DbPool, book_id: BookId) -> Result<Vec<Chapter>, AppError> {
    let rows = sqlx::query(
        "SELECT id, book_id, title, file_path, position, duration_ms, track_number, artist, album \
         FROM chapters WHERE book_id = ? ORDER BY position ASC",
    )
    .bind(book_id.as_string())
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::database("Failed to get book chapters", e))?;

    rows.into_iter().map(row_to_chapter).collect()
}

pub(crate) fn row_to_chapter(row: sqlx::sqlite::SqliteRow) -> Result<Chapter, AppError> {
    use sqlx::Row;

    let id_str: String = row
        .try_get("id")
        .map_err(|e| AppError::database("Missing chapter ID", e))?;
    let id =
        ChapterId::from_string(&id_str).map_err(|e| AppError::database("Invalid chapter ID", e))?;

    let book_id_str: String = row
        .try_get("book_id")
        .map_err(|e| AppError::database("Missing book ID", e))?;
    let book_id =
        BookId::from_string(&book_id_str).map_err(|e| AppError::database("Invalid book ID", e))?;

    let title: String = row
        .try_get("title")
        .map_err(|e| AppError::database("Missing chapter title", e))?;
    let file_path: String = row
        .try_get("file_path")
        .map_err(|e| AppError::database("Missing chapter file path", e))?;
    let position: i64 = row
        .try_get("position")
        .map_err(|e| AppError::database("Missing chapter position", e))?;
    let duration_ms: i64 = row
        .try_get("duration_ms")
        .map_err(|e| AppError::database("Missing chapter duration", e))?;

    let track_number: Option<i64> = row.try_get("track_number").ok().flatten();
    let artist: Option<String> = row.try_get("artist").ok().flatten();
    let album: Option<String> = row.try_get("album").ok().flatten();

    Ok(Chapter {
        id,
        book_id,
        title,
        file_path: PathBuf::from(file_path),
        position: position as u32,
        duration: Duration::from_millis(duration_ms as u64),
        track_number: track_number.map(|t| t as u32),
        artist,
        album,
    })
}
