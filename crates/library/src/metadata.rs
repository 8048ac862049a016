//! Tag extraction and per-book consensus aggregation.
//!
//! Individual chapter files are read with lofty; unreadable or untagged
//! files degrade to empty metadata rather than failing the import. Book-level
//! fields are then derived by majority vote across the book's chapters, with
//! ties broken in favor of the first-encountered value.

use crate::error::Result;
use audiofolio_core::{BookId, Duration, ScannedBook};
use lofty::file::TaggedFile;
use lofty::prelude::*;
use lofty::probe::Probe;
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Tags read from a single audio file
#[derive(Debug, Clone, Default)]
pub struct FileMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album_artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub track_number: Option<u32>,
    pub duration: Duration,
}

/// Book-level consensus derived from chapter tags
#[derive(Debug, Clone, Default)]
pub struct BookMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
}

/// Audio metadata extractor
#[derive(Debug, Default)]
pub struct MetadataExtractor;

impl MetadataExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Reads tags and audio properties from one file.
    ///
    /// Returns default (all-empty) metadata when the file cannot be parsed;
    /// a bad chapter file never aborts a book import.
    pub fn extract_file(&self, path: &Path) -> FileMetadata {
        let tagged_file = match Probe::open(path).and_then(|probe| probe.read()) {
            Ok(file) => file,
            Err(e) => {
                debug!("No readable tags in {}: {}", path.display(), e);
                return FileMetadata::default();
            }
        };

        let duration = Duration::from(tagged_file.properties().duration());

        let tag = match tagged_file.primary_tag() {
            Some(t) => t,
            None => {
                return FileMetadata {
                    duration,
                    ..Default::default()
                };
            }
        };

        FileMetadata {
            title: tag.title().map(|s| s.to_string()),
            artist: tag.artist().map(|s| s.to_string()),
            album_artist: tag
                .get_string(&ItemKey::AlbumArtist)
                .map(|s| s.to_string()),
            album: tag.album().map(|s| s.to_string()),
            genre: tag.genre().map(|s| s.to_string()),
            year: tag.year().map(|y| y as i32),
            track_number: tag.track(),
            duration,
        }
    }

    /// Enriches a scanned book in place from its chapter files.
    ///
    /// Chapter fields (title, track number, artist, album, duration) come
    /// from each file's own tags where present. Book fields are the
    /// per-field consensus across all chapters:
    /// - title candidates are the album tags; the folder name stands when no
    ///   chapter carries one
    /// - artist prefers album-artist over track artist per file
    /// - year is the first non-empty value in chapter order
    /// - total duration is the sum of chapter durations
    pub fn extract_book(&self, book: &mut ScannedBook) {
        let mut title_candidates = Vec::new();
        let mut artist_candidates = Vec::new();
        let mut album_candidates = Vec::new();
        let mut genre_candidates = Vec::new();
        let mut year = None;

        for chapter in &mut book.chapters {
            let meta = self.extract_file(&chapter.file_path);

            if let Some(title) = &meta.title {
                chapter.title = title.clone();
            }
            chapter.track_number = meta.track_number;
            chapter.artist = meta.artist.clone();
            chapter.album = meta.album.clone();
            chapter.duration = meta.duration;

            if let Some(album) = &meta.album {
                title_candidates.push(album.clone());
            }
            if let Some(artist) = meta.album_artist.or(meta.artist) {
                artist_candidates.push(artist);
            }
            if let Some(album) = meta.album {
                album_candidates.push(album);
            }
            if let Some(genre) = meta.genre {
                genre_candidates.push(genre);
            }
            if year.is_none() {
                year = meta.year;
            }
        }

        let consensus = BookMetadata {
            title: most_common(&title_candidates),
            artist: most_common(&artist_candidates),
            album: most_common(&album_candidates),
            genre: most_common(&genre_candidates),
            year,
        };

        if let Some(title) = &consensus.title {
            book.title = title.clone();
        }
        book.artist = consensus.artist;
        book.album = consensus.album;
        book.genre = consensus.genre;
        book.year = consensus.year;
        book.total_duration = book.chapters.iter().map(|c| c.duration).sum();
    }

    /// Extracts the first embedded picture from a chapter file and writes it
    /// as a JPEG named after the book under `covers_dir`.
    ///
    /// Returns the written path, or None when the file has no usable picture.
    pub fn extract_cover(
        &self,
        chapter_path: &Path,
        book_id: &BookId,
        covers_dir: &Path,
    ) -> Result<Option<PathBuf>> {
        let tagged_file = match Probe::open(chapter_path).and_then(|probe| probe.read()) {
            Ok(file) => file,
            Err(_) => return Ok(None),
        };

        let data = match first_picture(&tagged_file) {
            Some(data) => data,
            None => return Ok(None),
        };

        let img = match image::load_from_memory(data) {
            Ok(img) => img,
            Err(e) => {
                warn!(
                    "Undecodable cover art in {}: {}",
                    chapter_path.display(),
                    e
                );
                return Ok(None);
            }
        };

        std::fs::create_dir_all(covers_dir)?;
        let cover_path = covers_dir.join(format!("cover_{}.jpg", book_id.as_string()));
        if let Err(e) = img.save_with_format(&cover_path, image::ImageFormat::Jpeg) {
            warn!("Failed to write cover {}: {}", cover_path.display(), e);
            return Ok(None);
        }

        Ok(Some(cover_path))
    }
}

fn first_picture(tagged_file: &TaggedFile) -> Option<&[u8]> {
    let tag = tagged_file.primary_tag()?;
    let picture = tag.pictures().first()?;
    Some(picture.data())
}

/// Returns the most frequent value, breaking ties toward the value that
/// appeared first.
fn most_common(values: &[String]) -> Option<String> {
    let mut counts: Vec<(&String, usize)> = Vec::new();

    for value in values {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best: Option<(&String, usize)> = None;
    for (value, count) in counts {
        match best {
            // Strictly-greater keeps the earliest value on ties
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((value, count)),
        }
    }

    best.map(|(value, _)| value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use audiofolio_core::ScannedChapter;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_most_common_majority_wins() {
        let values = strings(&["Fantasy", "Fantasy", "SciFi"]);
        assert_eq!(most_common(&values), Some("Fantasy".to_string()));
    }

    #[test]
    fn test_most_common_tie_keeps_first_encountered() {
        let values = strings(&["A", "B"]);
        assert_eq!(most_common(&values), Some("A".to_string()));

        let values = strings(&["B", "A", "A", "B"]);
        assert_eq!(most_common(&values), Some("B".to_string()));
    }

    #[test]
    fn test_most_common_empty() {
        assert_eq!(most_common(&[]), None);
    }

    #[test]
    fn test_extract_file_on_garbage_degrades_to_default() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"not an audio file").unwrap();
        temp.flush().unwrap();

        let meta = MetadataExtractor::new().extract_file(temp.path());
        assert!(meta.title.is_none());
        assert!(meta.artist.is_none());
        assert!(meta.duration.is_zero());
    }

    #[test]
    fn test_extract_file_on_missing_path_degrades_to_default() {
        let meta = MetadataExtractor::new().extract_file(Path::new("/nonexistent/ch1.mp3"));
        assert!(meta.title.is_none());
        assert!(meta.year.is_none());
    }

    #[test]
    fn test_extract_book_with_unreadable_files_keeps_folder_title() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("ch1.mp3");
        std::fs::write(&path, b"garbage").unwrap();

        let mut book = ScannedBook::new(
            "Folder Title",
            temp.path().to_path_buf(),
            vec![ScannedChapter::new("ch1.mp3", path, 0)],
        );

        MetadataExtractor::new().extract_book(&mut book);

        assert_eq!(book.title, "Folder Title");
        assert!(book.artist.is_none());
        assert!(book.total_duration.is_zero());
        // Positions are never touched by metadata merge
        assert_eq!(book.chapters[0].position, 0);
        assert_eq!(book.chapters[0].title, "ch1.mp3");
    }

    #[test]
    fn test_extract_cover_on_garbage_returns_none() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("ch1.mp3");
        std::fs::write(&path, b"garbage").unwrap();

        let result = MetadataExtractor::new()
            .extract_cover(&path, &BookId::new(), temp.path())
            .unwrap();
        assert!(result.is_none());
    }
}
