use audiofolio_core::AppError;
use audiofolio_player::PlayerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Database error: {0}")]
    Database(#[from] AppError),

    #[error("Book not found: {0}")]
    BookNotFound(String),

    #[error("Invalid folder: {0}")]
    InvalidFolder(String),

    #[error("Import failed: {0}")]
    ImportFailed(String),

    #[error("Playback session error: {0}")]
    Session(#[from] PlayerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LibraryError>;
