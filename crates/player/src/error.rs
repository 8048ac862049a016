use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("No book loaded")]
    NotLoaded,

    #[error("Invalid chapter index {index} (book has {total} chapters)")]
    InvalidChapter { index: usize, total: usize },

    #[error("Invalid playback speed: {0}")]
    InvalidSpeed(String),

    #[error("Session store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, PlayerError>;
