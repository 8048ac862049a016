//! Atomic catalog replacement.
//!
//! A scan replaces the entire persisted catalog. The delete-then-insert
//! sequence runs inside a single transaction so readers never observe a
//! partial catalog, even across a crash mid-import.

use crate::DbPool;
use audiofolio_core::{AppError, Author, Book, BookId, ChapterId, ScanResult};
use log::{debug, info};
use std::path::PathBuf;

/// One inserted book, reported back so the importer can run the second phase
/// of the cover attach (the cover file name is keyed by the generated id).
#[derive(Debug, Clone)]
pub struct ImportedBook {
    pub id: BookId,
    pub title: String,
    pub first_chapter: Option<PathBuf>,
}

/// Outcome of a catalog replacement
#[derive(Debug, Clone, Default)]
pub struct CatalogReplacement {
    pub books_imported: usize,
    pub books: Vec<ImportedBook>,
}

/// Replaces the whole catalog with the given scan result.
///
/// Deletes chapters, then books, then authors, then inserts the new rows,
/// all within one transaction. Books are inserted without covers; callers
/// attach covers afterwards via [`crate::queries::books::update_cover`].
pub async fn replace_catalog(
    pool: &DbPool,
    scan: &ScanResult,
) -> Result<CatalogReplacement, AppError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| AppError::database("Failed to begin catalog transaction", e))?;

    // Delete in child-first order; explicit even though cascades would cover it
    for table in ["chapters", "books", "authors"] {
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear {}", table), e))?;
    }

    let mut result = CatalogReplacement::default();

    for (author_name, books) in scan {
        let author = Author::new(author_name.clone(), books.len() as u32);

        sqlx::query("INSERT INTO authors (id, name, book_count) VALUES (?, ?, ?)")
            .bind(author.id.as_string())
            .bind(&author.name)
            .bind(author.book_count as i64)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database("Failed to insert author", e))?;

        for scanned in books {
            let mut book = Book::new(&scanned.title, scanned.folder_path.clone(), author.id);
            book.artist = scanned.artist.clone();
            book.album = scanned.album.clone();
            book.genre = scanned.genre.clone();
            book.year = scanned.year;
            book.total_duration = scanned.total_duration;

            sqlx::query(
                "INSERT INTO books (id, title, folder_path, author_id, artist, album, genre, \
                 year, total_duration_ms, added_date) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(book.id.as_string())
            .bind(&book.title)
            .bind(book.folder_path.to_str())
            .bind(book.author_id.as_string())
            .bind(&book.artist)
            .bind(&book.album)
            .bind(&book.genre)
            .bind(book.year.map(|y| y as i64))
            .bind(book.total_duration.as_millis() as i64)
            .bind(book.added_date.as_millis())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database("Failed to insert book", e))?;

            for chapter in &scanned.chapters {
                sqlx::query(
                    "INSERT INTO chapters (id, book_id, title, file_path, position, \
                     duration_ms, track_number, artist, album) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(ChapterId::new().as_string())
                .bind(book.id.as_string())
                .bind(&chapter.title)
                .bind(chapter.file_path.to_str())
                .bind(chapter.position as i64)
                .bind(chapter.duration.as_millis() as i64)
                .bind(chapter.track_number.map(|t| t as i64))
                .bind(&chapter.artist)
                .bind(&chapter.album)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::database("Failed to insert chapter", e))?;
            }

            debug!(
                "Imported '{}' by {} ({} chapters)",
                book.title,
                author.name,
                scanned.chapters.len()
            );

            result.books.push(ImportedBook {
                id: book.id,
                title: book.title.clone(),
                first_chapter: scanned.chapters.first().map(|c| c.file_path.clone()),
            });
            result.books_imported += 1;
        }
    }

    tx.commit()
        .await
        .map_err(|e| AppError::database("Failed to commit catalog transaction", e))?;

    info!(
        "Catalog replaced: {} authors, {} books",
        scan.len(),
        result.books_imported
    );

    Ok(result)
}
