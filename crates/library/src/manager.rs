//! The library facade.
//!
//! Owns the database pool and exposes the catalog surface the UI layer
//! consumes: imports, browse queries, progress mutations, and session
//! persistence for the playback engine.

use crate::error::{LibraryError, Result};
use crate::import::{ImportSummary, LibraryImporter};
use crate::LibraryConfig;
use async_trait::async_trait;
use audiofolio_core::{
    AppError, Author, AuthorId, Book, BookId, Chapter, Duration, Timestamp,
};
use audiofolio_database::{connect, queries, run_migrations, verify_integrity, DatabaseConfig, DbPool};
use audiofolio_player::{PlayerError, PlayerSession, SessionStore, Transport};
use log::info;
use std::path::Path;
use std::sync::Arc;

/// An author together with their books, for the browse screen
#[derive(Debug, Clone)]
pub struct AuthorWithBooks {
    pub author: Author,
    pub books: Vec<Book>,
}

/// High-level entry point over the catalog
pub struct LibraryManager {
    pool: DbPool,
    config: LibraryConfig,
}

impl LibraryManager {
    /// Connects to the catalog database and applies pending migrations
    pub async fn new(config: LibraryConfig) -> Result<Self> {
        let pool = connect(DatabaseConfig::new(config.database_path.clone())).await?;
        run_migrations(&pool).await?;
        info!("Library opened at {}", config.database_path);
        Ok(Self { pool, config })
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Runs SQLite's integrity check against the catalog
    pub async fn check_integrity(&self) -> Result<()> {
        Ok(verify_integrity(&self.pool).await?)
    }

    /// Rescans a folder tree, replacing the whole catalog
    pub async fn import_folder(&self, root: &Path) -> Result<ImportSummary> {
        let importer = LibraryImporter::new(self.pool.clone(), self.config.covers_dir.clone());
        importer.import_folder(root).await
    }

    pub async fn list_authors(&self) -> Result<Vec<Author>> {
        Ok(queries::authors::list_authors(&self.pool).await?)
    }

    /// Authors with their books, ordered by author name then book title
    pub async fn list_authors_with_books(&self) -> Result<Vec<AuthorWithBooks>> {
        let authors = queries::authors::list_authors(&self.pool).await?;
        let mut result = Vec::with_capacity(authors.len());
        for author in authors {
            let books = queries::books::get_books_by_author(&self.pool, author.id).await?;
            result.push(AuthorWithBooks { author, books });
        }
        Ok(result)
    }

    pub async fn list_books(&self) -> Result<Vec<Book>> {
        Ok(queries::books::list_books(&self.pool).await?)
    }

    pub async fn get_book(&self, id: BookId) -> Result<Book> {
        match queries::books::get_book(&self.pool, id).await {
            Ok(book) => Ok(book),
            Err(AppError::RecordNotFound { .. }) => {
                Err(LibraryError::BookNotFound(id.as_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_books_by_author(&self, author_id: AuthorId) -> Result<Vec<Book>> {
        Ok(queries::books::get_books_by_author(&self.pool, author_id).await?)
    }

    /// One author and their books, by author id
    pub async fn get_author_with_books(&self, author_id: AuthorId) -> Result<AuthorWithBooks> {
        let author = queries::authors::get_author(&self.pool, author_id).await?;
        let books = queries::books::get_books_by_author(&self.pool, author_id).await?;
        Ok(AuthorWithBooks { author, books })
    }

    /// Unfinished books with a saved position, most recently played first
    pub async fn continue_listening(&self) -> Result<Vec<Book>> {
        Ok(queries::books::get_continue_listening(&self.pool).await?)
    }

    pub async fn recently_played(&self, limit: i64) -> Result<Vec<Book>> {
        Ok(queries::books::get_recently_played(&self.pool, limit).await?)
    }

    pub async fn get_chapters(&self, book_id: BookId) -> Result<Vec<Chapter>> {
        Ok(queries::chapters::get_book_chapters(&self.pool, book_id).await?)
    }

    pub async fn mark_book_finished(&self, id: BookId) -> Result<()> {
        Ok(queries::books::mark_finished(&self.pool, id).await?)
    }

    /// Opens a playback session for a book, with this manager as the
    /// persistence backend.
    pub async fn open_session(
        self: &Arc<Self>,
        book_id: BookId,
        transport: Arc<dyn Transport>,
    ) -> Result<PlayerSession> {
        let book = self.get_book(book_id).await?;
        let chapters = self.get_chapters(book_id).await?;
        Ok(PlayerSession::start(
            &book,
            &chapters,
            transport,
            Arc::clone(self) as Arc<dyn SessionStore>,
        )?)
    }
}

#[async_trait]
impl SessionStore for LibraryManager {
    async fn save_progress(
        &self,
        book_id: BookId,
        chapter_index: u32,
        position: Duration,
    ) -> std::result::Result<(), PlayerError> {
        queries::books::update_progress(&self.pool, book_id, chapter_index, position)
            .await
            .map_err(|e| PlayerError::Store(e.to_string()))
    }

    async fn save_speed(&self, book_id: BookId, speed: f32) -> std::result::Result<(), PlayerError> {
        queries::books::update_speed(&self.pool, book_id, speed)
            .await
            .map_err(|e| PlayerError::Store(e.to_string()))
    }

    async fn save_sleep_timer(
        &self,
        book_id: BookId,
        end: Option<Timestamp>,
    ) -> std::result::Result<(), PlayerError> {
        queries::books::set_sleep_timer(&self.pool, book_id, end)
            .await
            .map_err(|e| PlayerError::Store(e.to_string()))
    }

    async fn mark_finished(&self, book_id: BookId) -> std::result::Result<(), PlayerError> {
        queries::books::mark_finished(&self.pool, book_id)
            .await
            .map_err(|e| PlayerError::Store(e.to_string()))
    }
}
