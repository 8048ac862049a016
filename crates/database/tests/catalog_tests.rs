//! Integration tests for the catalog replace and the book mutation surface.

use audiofolio_core::{Duration, ScanResult, ScannedBook, ScannedChapter, Timestamp};
use audiofolio_database::queries::{authors, books, chapters};
use audiofolio_database::{connect, replace_catalog, run_migrations, DatabaseConfig, DbPool};
use std::collections::HashSet;
use std::path::PathBuf;
use tempfile::NamedTempFile;

async fn setup_db() -> (DbPool, NamedTempFile) {
    let temp = NamedTempFile::new().unwrap();
    let config = DatabaseConfig::new(temp.path().to_str().unwrap());
    let pool = connect(config).await.unwrap();
    run_migrations(&pool).await.unwrap();
    (pool, temp)
}

fn library_scan() -> ScanResult {
    let mut scan = ScanResult::new();

    let mut novel = ScannedBook::new(
        "The Left Hand",
        PathBuf::from("/lib/LeGuin/LeftHand"),
        vec![
            ScannedChapter::new("01.mp3", PathBuf::from("/lib/LeGuin/LeftHand/01.mp3"), 0),
            ScannedChapter::new("02.mp3", PathBuf::from("/lib/LeGuin/LeftHand/02.mp3"), 1),
            ScannedChapter::new("03.mp3", PathBuf::from("/lib/LeGuin/LeftHand/03.mp3"), 2),
        ],
    );
    novel.total_duration = Duration::from_seconds(3 * 600);

    let shorts = ScannedBook::new(
        "Earthsea",
        PathBuf::from("/lib/LeGuin/Earthsea"),
        vec![ScannedChapter::new(
            "part1.mp3",
            PathBuf::from("/lib/LeGuin/Earthsea/part1.mp3"),
            0,
        )],
    );

    let other = ScannedBook::new(
        "Ancillary Justice",
        PathBuf::from("/lib/Leckie/Ancillary"),
        vec![
            ScannedChapter::new("a.mp3", PathBuf::from("/lib/Leckie/Ancillary/a.mp3"), 0),
            ScannedChapter::new("b.mp3", PathBuf::from("/lib/Leckie/Ancillary/b.mp3"), 1),
        ],
    );

    scan.insert("Ursula K. Le Guin".to_string(), vec![novel, shorts]);
    scan.insert("Ann Leckie".to_string(), vec![other]);
    scan
}

#[tokio::test]
async fn chapter_positions_are_dense_and_ordered() {
    let (pool, _tmp) = setup_db().await;
    let result = replace_catalog(&pool, &library_scan()).await.unwrap();

    for imported in &result.books {
        let chs = chapters::get_book_chapters(&pool, imported.id).await.unwrap();
        let positions: Vec<u32> = chs.iter().map(|c| c.position).collect();
        let expected: Vec<u32> = (0..chs.len() as u32).collect();
        assert_eq!(positions, expected, "book {} has gapped positions", imported.title);
    }
}

#[tokio::test]
async fn no_orphan_books() {
    let (pool, _tmp) = setup_db().await;
    replace_catalog(&pool, &library_scan()).await.unwrap();

    let author_ids: HashSet<String> = authors::list_authors(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.id.as_string())
        .collect();

    for book in books::list_books(&pool).await.unwrap() {
        assert!(author_ids.contains(&book.author_id.as_string()));
    }
}

#[tokio::test]
async fn rescan_is_idempotent_modulo_ids() {
    let (pool, _tmp) = setup_db().await;
    let scan = library_scan();

    replace_catalog(&pool, &scan).await.unwrap();
    let first = catalog_shape(&pool).await;

    replace_catalog(&pool, &scan).await.unwrap();
    let second = catalog_shape(&pool).await;

    assert_eq!(first, second);
}

/// (author name, book title, chapter count) tuples, identifier-free
async fn catalog_shape(pool: &DbPool) -> Vec<(String, String, usize)> {
    let mut shape = Vec::new();
    for author in authors::list_authors(pool).await.unwrap() {
        for book in books::get_books_by_author(pool, author.id).await.unwrap() {
            let chs = chapters::get_book_chapters(pool, book.id).await.unwrap();
            shape.push((author.name.clone(), book.title, chs.len()));
        }
    }
    shape
}

#[tokio::test]
async fn update_progress_sets_resume_point_and_last_played() {
    let (pool, _tmp) = setup_db().await;
    let result = replace_catalog(&pool, &library_scan()).await.unwrap();
    let id = result.books[0].id;

    let before = Timestamp::now();
    books::update_progress(&pool, id, 2, Duration::from_millis(45_000))
        .await
        .unwrap();

    let book = books::get_book(&pool, id).await.unwrap();
    assert_eq!(book.current_chapter_index, 2);
    assert_eq!(book.current_position.as_millis(), 45_000);
    assert!(book.last_played.unwrap() >= before);
}

#[tokio::test]
async fn mark_finished_resets_resume_point() {
    let (pool, _tmp) = setup_db().await;
    let result = replace_catalog(&pool, &library_scan()).await.unwrap();
    let id = result.books[0].id;

    books::update_progress(&pool, id, 1, Duration::from_millis(30_000))
        .await
        .unwrap();
    books::mark_finished(&pool, id).await.unwrap();

    let book = books::get_book(&pool, id).await.unwrap();
    assert!(book.is_finished);
    assert_eq!(book.current_chapter_index, 0);
    assert!(book.current_position.is_zero());
}

#[tokio::test]
async fn continue_listening_filters_and_sorts() {
    let (pool, _tmp) = setup_db().await;
    let result = replace_catalog(&pool, &library_scan()).await.unwrap();

    // Book 0: in progress. Book 1: in progress then finished. Book 2: untouched.
    books::update_progress(&pool, result.books[0].id, 0, Duration::from_millis(1_000))
        .await
        .unwrap();
    books::update_progress(&pool, result.books[1].id, 0, Duration::from_millis(2_000))
        .await
        .unwrap();
    books::mark_finished(&pool, result.books[1].id).await.unwrap();

    let continuing = books::get_continue_listening(&pool).await.unwrap();
    assert_eq!(continuing.len(), 1);
    assert_eq!(continuing[0].id, result.books[0].id);
}

#[tokio::test]
async fn recently_played_respects_limit_and_order() {
    let (pool, _tmp) = setup_db().await;
    let result = replace_catalog(&pool, &library_scan()).await.unwrap();

    for (i, imported) in result.books.iter().enumerate() {
        books::update_progress(&pool, imported.id, 0, Duration::from_millis(1_000))
            .await
            .unwrap();
        // Distinct last_played stamps
        tokio::time::sleep(std::time::Duration::from_millis(5 * (i as u64 + 1))).await;
    }

    let recent = books::get_recently_played(&pool, 2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert!(recent[0].last_played.unwrap() >= recent[1].last_played.unwrap());
}

#[tokio::test]
async fn sleep_timer_roundtrip() {
    let (pool, _tmp) = setup_db().await;
    let result = replace_catalog(&pool, &library_scan()).await.unwrap();
    let id = result.books[0].id;

    let end = Timestamp::from_millis(1_900_000_000_000);
    books::set_sleep_timer(&pool, id, Some(end)).await.unwrap();
    assert_eq!(books::get_book(&pool, id).await.unwrap().sleep_timer_end, Some(end));

    books::set_sleep_timer(&pool, id, None).await.unwrap();
    assert!(books::get_book(&pool, id).await.unwrap().sleep_timer_end.is_none());
}

#[tokio::test]
async fn cover_attach_two_phase() {
    let (pool, _tmp) = setup_db().await;
    let result = replace_catalog(&pool, &library_scan()).await.unwrap();
    let id = result.books[0].id;

    // Phase one: inserted without a cover
    assert!(books::get_book(&pool, id).await.unwrap().cover_path.is_none());

    // Phase two: attach by generated id
    let cover = PathBuf::from(format!("/covers/cover_{}.jpg", id));
    books::update_cover(&pool, id, &cover).await.unwrap();
    assert_eq!(books::get_book(&pool, id).await.unwrap().cover_path, Some(cover));
}
