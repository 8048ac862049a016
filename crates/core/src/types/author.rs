//! Author domain model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthorId(Uuid);

impl AuthorId {
    /// Creates a new random AuthorId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an AuthorId from a UUID string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Returns the AuthorId as a string
    pub fn as_string(&self) -> String {
        self.0.to_string()
    }
}

impl Default for AuthorId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AuthorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An author grouping in the catalog.
///
/// Authors are rebuilt wholesale on every scan; `book_count` is the
/// denormalized count computed at scan time, not maintained incrementally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    pub book_count: u32,
}

impl Author {
    pub fn new(name: impl Into<String>, book_count: u32) -> Self {
        Self {
            id: AuthorId::new(),
            name: name.into(),
            book_count,
        }
    }
}
