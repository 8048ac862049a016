use anyhow::{Context, Result};
use audiofolio_core::{Book, BookId};
use audiofolio_library::{LibraryConfig, LibraryManager};
use console::style;
use std::path::Path;

pub async fn open_library(db_path: &str, covers_dir: &str) -> Result<LibraryManager> {
    let config = LibraryConfig::new(db_path).with_covers_dir(covers_dir);
    LibraryManager::new(config)
        .await
        .context("Failed to open library database")
}

/// Scan a folder tree and replace the catalog with what it holds
pub async fn scan_folder(db_path: &str, covers_dir: &str, folder: &str) -> Result<()> {
    let root = Path::new(folder);
    let library = open_library(db_path, covers_dir).await?;

    println!("Scanning {} ...", style(root.display()).bold());
    let summary = library
        .import_folder(root)
        .await
        .context("Failed to import folder")?;

    println!(
        "{} Imported {} books by {} authors ({} covers extracted)",
        style("✓").green().bold(),
        style(summary.books_imported).bold(),
        summary.authors_imported,
        summary.covers_attached
    );
    Ok(())
}

/// List all books in the library
pub async fn list_books(db_path: &str, covers_dir: &str) -> Result<()> {
    let library = open_library(db_path, covers_dir).await?;
    let books = library.list_books().await.context("Failed to list books")?;

    if books.is_empty() {
        println!("No books in library. Use 'scan' to import an audiobook folder.");
        return Ok(());
    }

    println!("\n{} Books in Library", style(books.len()).bold().cyan());
    println!("{}", "=".repeat(72));
    for book in &books {
        print_book_summary(book);
    }
    Ok(())
}

/// List authors with their books
pub async fn list_authors(db_path: &str, covers_dir: &str) -> Result<()> {
    let library = open_library(db_path, covers_dir).await?;
    let authors = library
        .list_authors_with_books()
        .await
        .context("Failed to list authors")?;

    if authors.is_empty() {
        println!("No authors in library. Use 'scan' to import an audiobook folder.");
        return Ok(());
    }

    for entry in &authors {
        println!(
            "\n{} ({} books)",
            style(&entry.author.name).bold().cyan(),
            entry.author.book_count
        );
        for book in &entry.books {
            println!("  {} [{}]", book.title, book.total_duration.as_hms());
        }
    }
    Ok(())
}

/// Show unfinished books with a saved position
pub async fn continue_listening(db_path: &str, covers_dir: &str) -> Result<()> {
    let library = open_library(db_path, covers_dir).await?;
    let books = library
        .continue_listening()
        .await
        .context("Failed to query continue-listening books")?;

    if books.is_empty() {
        println!("Nothing in progress.");
        return Ok(());
    }

    println!("\n{}", style("Continue Listening").bold().cyan());
    println!("{}", "=".repeat(72));
    for book in &books {
        print_book_summary(book);
    }
    Ok(())
}

/// Show recently played books
pub async fn recently_played(db_path: &str, covers_dir: &str, limit: i64) -> Result<()> {
    let library = open_library(db_path, covers_dir).await?;
    let books = library
        .recently_played(limit)
        .await
        .context("Failed to query recently played books")?;

    if books.is_empty() {
        println!("No listening history yet.");
        return Ok(());
    }

    println!("\n{}", style("Recently Played").bold().cyan());
    println!("{}", "=".repeat(72));
    for book in &books {
        print_book_summary(book);
    }
    Ok(())
}

/// Show detailed information about one book
pub async fn show_book_info(db_path: &str, covers_dir: &str, id: &str) -> Result<()> {
    let book_id = BookId::from_string(id).context("Invalid book ID")?;
    let library = open_library(db_path, covers_dir).await?;

    let book = library.get_book(book_id).await?;
    let chapters = library.get_chapters(book_id).await?;

    println!("\n{}", style(&book.title).bold().cyan());
    println!("{}", "=".repeat(72));
    println!("ID:        {}", book.id);
    if let Some(artist) = &book.artist {
        println!("Artist:    {}", artist);
    }
    if let Some(album) = &book.album {
        println!("Album:     {}", album);
    }
    if let Some(genre) = &book.genre {
        println!("Genre:     {}", genre);
    }
    if let Some(year) = book.year {
        println!("Year:      {}", year);
    }
    println!("Folder:    {}", book.folder_path.display());
    if let Some(cover) = &book.cover_path {
        println!("Cover:     {}", cover.display());
    }
    println!("Duration:  {}", book.total_duration.as_hms());
    println!("Speed:     {:.2}x", book.playback_speed);
    println!(
        "Progress:  {:.0}% (chapter {}, {})",
        book.progress() * 100.0,
        book.current_chapter_index + 1,
        book.current_position.as_hms()
    );

    println!("\nChapters ({}):", chapters.len());
    for chapter in &chapters {
        println!(
            "  {:>3}. {} [{}]",
            chapter.position + 1,
            chapter.title,
            chapter.duration.as_hms()
        );
    }
    Ok(())
}

fn print_book_summary(book: &Book) {
    let marker = if book.is_finished {
        style("done").green().to_string()
    } else if book.has_progress() {
        format!("{:.0}%", book.progress() * 100.0)
    } else {
        "new".to_string()
    };

    println!(
        "{}  {} [{}] ({})",
        style(&book.id.as_string()[..8]).dim(),
        style(&book.title).bold(),
        book.total_duration.as_hms(),
        marker
    );
}
