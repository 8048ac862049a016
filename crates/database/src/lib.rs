//! Audiofolio persistence layer.
//!
//! SQLite via sqlx: connection pool, migrations, the catalog query surface,
//! and the transactional replace-all import used by the scanner.

pub mod catalog;
pub mod connection;
pub mod migrations;
pub mod queries;

pub use catalog::{replace_catalog, CatalogReplacement, ImportedBook};
pub use connection::{connect, DatabaseConfig, DbPool};
pub use migrations::{current_version, run_migrations, verify_integrity};
