//! Connection pool setup for the catalog database.
//!
//! Connect options are applied per pooled connection: WAL journaling for
//! read concurrency during imports, and foreign key enforcement so the
//! author → book → chapter cascades hold no matter which connection a
//! statement lands on.

use audiofolio_core::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

/// Database connection pool
pub type DbPool = Pool<Sqlite>;

/// Settings for opening the catalog database.
///
/// The database file is created on first open.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "audiofolio.db".to_string(),
            max_connections: 10,
        }
    }
}

impl DatabaseConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    fn connect_options(&self) -> Result<SqliteConnectOptions, AppError> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", self.path))
            .map_err(|e| AppError::database("Invalid database path", e))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);
        Ok(options)
    }
}

/// Opens the pool described by `config`
pub async fn connect(config: DatabaseConfig) -> Result<DbPool, AppError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(config.connect_options()?)
        .await
        .map_err(|e| AppError::database("Failed to open catalog database", e))?;

    Ok(pool)
}

/// Flushes and closes the pool
pub async fn close(pool: DbPool) {
    pool.close().await;
}

/// Opens an in-memory database for tests. Single connection, since each
/// in-memory connection would otherwise see its own empty database.
#[cfg(test)]
pub async fn create_test_db() -> Result<DbPool, AppError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(|e| AppError::database("Invalid in-memory database URI", e))?
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| AppError::database("Failed to open in-memory database", e))
}
