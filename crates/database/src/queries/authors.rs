//! Author database operations

use crate::DbPool;
use audiofolio_core::{AppError, Author, AuthorId};

/// Gets an author by ID
pub async fn get_author(pool: &DbPool, id: AuthorId) -> Result<Author, AppError> {
    let row = sqlx::query("SELECT id, name, book_count FROM authors WHERE id = ?")
        .bind(id.as_string())
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::database("Failed to fetch author", e))?
        .ok_or_else(|| AppError::not_found("Author", id))?;

    row_to_author(row)
}

/// Lists all authors sorted by name
pub async fn list_authors(pool: &DbPool) -> Result<Vec<Author>, AppError> {
    let rows = sqlx::query("SELECT id, name, book_count FROM authors ORDER BY name ASC")
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::database("Failed to list authors", e))?;

    rows.into_iter().map(row_to_author).collect()
}

pub(crate) fn row_to_author(row: sqlx::sqlite::SqliteRow) -> Result<Author, AppError> {
    use sqlx::Row;

    let id_str: String = row
        .try_get("id")
        .map_err(|e| AppError::database("Missing author ID", e))?;
    let id =
        AuthorId::from_string(&id_str).map_err(|e| AppError::database("Invalid author ID", e))?;

    let name: String = row
        .try_get("name")
        .map_err(|e| AppError::database("Missing author name", e))?;

    let book_count: i64 = row
        .try_get("book_count")
        .map_err(|e| AppError::database("Missing book count", e))?;

    Ok(Author {
        id,
        name,
        book_count: book_count as u32,
    })
}
