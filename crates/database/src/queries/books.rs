//! Book database operations: the read and mutation surface consumed by the
//! library manager and the playback session.
//!
//! All mutations are plain `UPDATE`s; a call against a book id that no longer
//! exists affects zero rows and is silently skipped.

use crate::DbPool;
use audiofolio_core::{AppError, AuthorId, Book, BookId, Duration, Timestamp};
use std::path::{Path, PathBuf};

const BOOK_COLUMNS: &str = "id, title, folder_path, author_id, artist, album, genre, year, \
     cover_path, total_duration_ms, current_chapter_index, current_position_ms, \
     playback_speed, sleep_timer_end, is_finished, added_date, last_played";

/// Gets a book by ID
pub async fn get_book(pool: &DbPool, id: BookId) -> Result<Book, AppError> {
    let row = sqlx::query(&format!("SELECT {} FROM books WHERE id = ?", BOOK_COLUMNS))
        .bind(id.as_string())
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::database("Failed to fetch book", e))?
        .ok_or_else(|| AppError::not_found("Book", id))?;

    row_to_book(row)
}

/// Lists all books sorted by title
pub async fn list_books(pool: &DbPool) -> Result<Vec<Book>, AppError> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM books ORDER BY title ASC",
        BOOK_COLUMNS
    ))
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::database("Failed to list books", e))?;

    rows.into_iter().map(row_to_book).collect()
}

/// Gets one author's books sorted by title
pub async fn get_books_by_author(pool: &DbPool, author_id: AuthorId) -> Result<Vec<Book>, AppError> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM books WHERE author_id = ? ORDER BY title ASC",
        BOOK_COLUMNS
    ))
    .bind(author_id.as_string())
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::database("Failed to get books by author", e))?;

    rows.into_iter().map(row_to_book).collect()
}

/// Gets books with a saved position that are not finished, most recent first
pub async fn get_continue_listening(pool: &DbPool) -> Result<Vec<Book>, AppError> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM books \
         WHERE current_position_ms > 0 AND is_finished = 0 \
         ORDER BY last_played DESC",
        BOOK_COLUMNS
    ))
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::database("Failed to get continue listening", e))?;

    rows.into_iter().map(row_to_book).collect()
}

/// Gets recently played books, most recent first
pub async fn get_recently_played(pool: &DbPool, limit: i64) -> Result<Vec<Book>, AppError> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM books \
         WHERE last_played IS NOT NULL \
         ORDER BY last_played DESC LIMIT ?",
        BOOK_COLUMNS
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::database("Failed to get recently played", e))?;

    rows.into_iter().map(row_to_book).collect()
}

/// Saves the resume point and stamps `last_played`
pub async fn update_progress(
    pool: &DbPool,
    id: BookId,
    chapter_index: u32,
    position: Duration,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE books SET current_chapter_index = ?, current_position_ms = ?, last_played = ? \
         WHERE id = ?",
    )
    .bind(chapter_index as i64)
    .bind(position.as_millis() as i64)
    .bind(Timestamp::now().as_millis())
    .bind(id.as_string())
    .execute(pool)
    .await
    .map_err(|e| AppError::database("Failed to update progress", e))?;

    Ok(())
}

/// Saves the playback speed
pub async fn update_speed(pool: &DbPool, id: BookId, speed: f32) -> Result<(), AppError> {
    sqlx::query("UPDATE books SET playback_speed = ? WHERE id = ?")
        .bind(speed as f64)
        .bind(id.as_string())
        .execute(pool)
        .await
        .map_err(|e| AppError::database("Failed to update playback speed", e))?;

    Ok(())
}

/// Saves or clears the sleep timer end time
pub async fn set_sleep_timer(
    pool: &DbPool,
    id: BookId,
    end_time: Option<Timestamp>,
) -> Result<(), AppError> {
    sqlx::query("UPDATE books SET sleep_timer_end = ? WHERE id = ?")
        .bind(end_time.map(|t| t.as_millis()))
        .bind(id.as_string())
        .execute(pool)
        .await
        .map_err(|e| AppError::database("Failed to set sleep timer", e))?;

    Ok(())
}

/// Marks a book finished and snaps the resume point back to the start
pub async fn mark_finished(pool: &DbPool, id: BookId) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE books SET is_finished = 1, current_chapter_index = 0, current_position_ms = 0 \
         WHERE id = ?",
    )
    .bind(id.as_string())
    .execute(pool)
    .await
    .map_err(|e| AppError::database("Failed to mark book finished", e))?;

    Ok(())
}

/// Attaches an extracted cover image to a book (second phase of the import's
/// two-phase cover write)
pub async fn update_cover(pool: &DbPool, id: BookId, cover_path: &Path) -> Result<(), AppError> {
    sqlx::query("UPDATE books SET cover_path = ? WHERE id = ?")
        .bind(cover_path.to_str())
        .bind(id.as_string())
        .execute(pool)
        .await
        .map_err(|e| AppError::database("Failed to update cover", e))?;

    Ok(())
}

pub(crate) fn row_to_book(row: sqlx::sqlite::SqliteRow) -> Result<Book, AppError> {
    use sqlx::Row;

    let id_str: String = row
        .try_get("id")
        .map_err(|e| AppError::database("Missing book ID", e))?;
    let id = BookId::from_string(&id_str).map_err(|e| AppError::database("Invalid book ID", e))?;

    let author_id_str: String = row
        .try_get("author_id")
        .map_err(|e| AppError::database("Missing author ID", e))?;
    let author_id = AuthorId::from_string(&author_id_str)
        .map_err(|e| AppError::database("Invalid author ID", e))?;

    let title: String = row
        .try_get("title")
        .map_err(|e| AppError::database("Missing title", e))?;
    let folder_path: String = row
        .try_get("folder_path")
        .map_err(|e| AppError::database("Missing folder path", e))?;

    let total_duration_ms: i64 = row
        .try_get("total_duration_ms")
        .map_err(|e| AppError::database("Missing total duration", e))?;
    let current_chapter_index: i64 = row
        .try_get("current_chapter_index")
        .map_err(|e| AppError::database("Missing chapter index", e))?;
    let current_position_ms: i64 = row
        .try_get("current_position_ms")
        .map_err(|e| AppError::database("Missing position", e))?;
    let playback_speed: f64 = row
        .try_get("playback_speed")
        .map_err(|e| AppError::database("Missing playback speed", e))?;
    let is_finished: i64 = row
        .try_get("is_finished")
        .map_err(|e| AppError::database("Missing is_finished", e))?;
    let added_date: i64 = row
        .try_get("added_date")
        .map_err(|e| AppError::database("Missing added date", e))?;

    let artist: Option<String> = row.try_get("artist").ok().flatten();
    let album: Option<String> = row.try_get("album").ok().flatten();
    let genre: Option<String> = row.try_get("genre").ok().flatten();
    let year: Option<i64> = row.try_get("year").ok().flatten();
    let cover_path: Option<String> = row.try_get("cover_path").ok().flatten();
    let sleep_timer_end: Option<i64> = row.try_get("sleep_timer_end").ok().flatten();
    let last_played: Option<i64> = row.try_get("last_played").ok().flatten();

    Ok(Book {
        id,
        title,
        folder_path: PathBuf::from(folder_path),
        author_id,
        artist,
        album,
        genre,
        year: year.map(|y| y as i32),
        cover_path: cover_path.map(PathBuf::from),
        total_duration: Duration::from_millis(total_duration_ms as u64),
        current_chapter_index: current_chapter_index as u32,
        current_position: Duration::from_millis(current_position_ms as u64),
        playback_speed: playback_speed as f32,
        sleep_timer_end: sleep_timer_end.map(Timestamp::from_millis),
        is_finished: is_finished != 0,
        added_date: Timestamp::from_millis(added_date),
        last_played: last_played.map(Timestamp::from_millis),
    })
}
