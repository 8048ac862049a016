//! Query modules for the persisted catalog

pub mod authors;
pub mod books;
pub mod chapters;
