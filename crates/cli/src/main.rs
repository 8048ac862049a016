use anyhow::{Context, Result};
use clap::{Arg, Command};

mod commands;

fn build_cli() -> Command {
    Command::new("audiofolio")
        .version("0.1.0")
        .about("Audiobook library manager: folder scanning, catalog, resume state")
        .arg(
            Arg::new("database")
                .short('d')
                .long("database")
                .value_name("PATH")
                .help("Path to the database file")
                .default_value("audiofolio.db")
                .global(true),
        )
        .arg(
            Arg::new("covers")
                .long("covers")
                .value_name("DIR")
                .help("Directory for extracted cover images")
                .default_value("covers")
                .global(true),
        )
        .subcommand(Command::new("init").about("Initialize the database and create tables"))
        .subcommand(
            Command::new("scan")
                .about("Scan an audiobook folder tree, replacing the whole catalog")
                .arg(
                    Arg::new("path")
                        .required(true)
                        .value_name("DIR")
                        .help("Root folder to scan"),
                ),
        )
        .subcommand(Command::new("list").about("List all books in the library"))
        .subcommand(Command::new("authors").about("List authors with their books"))
        .subcommand(
            Command::new("continue").about("Show unfinished books with a saved position"),
        )
        .subcommand(
            Command::new("recent")
                .about("Show recently played books")
                .arg(
                    Arg::new("limit")
                        .short('n')
                        .long("limit")
                        .value_name("COUNT")
                        .help("Maximum number of books to show")
                        .default_value("10"),
                ),
        )
        .subcommand(
            Command::new("info")
                .about("Show detailed information about a book")
                .arg(
                    Arg::new("id")
                        .required(true)
                        .value_name("BOOK_ID")
                        .help("Book ID (UUID)"),
                ),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = build_cli().get_matches();
    let db_path = matches
        .get_one::<String>("database")
        .map(|s| s.as_str())
        .unwrap_or("audiofolio.db");
    let covers_dir = matches
        .get_one::<String>("covers")
        .map(|s| s.as_str())
        .unwrap_or("covers");

    match matches.subcommand() {
        Some(("init", _)) => {
            let library = commands::open_library(db_path, covers_dir)
                .await
                .context("Failed to initialize database")?;
            library
                .check_integrity()
                .await
                .context("Database integrity check failed")?;
            println!("Database initialized at {}", db_path);
            Ok(())
        }
        Some(("scan", sub_matches)) => {
            let path = sub_matches
                .get_one::<String>("path")
                .ok_or_else(|| anyhow::anyhow!("Scan path is required"))?;
            commands::scan_folder(db_path, covers_dir, path).await
        }
        Some(("list", _)) => commands::list_books(db_path, covers_dir).await,
        Some(("authors", _)) => commands::list_authors(db_path, covers_dir).await,
        Some(("continue", _)) => commands::continue_listening(db_path, covers_dir).await,
        Some(("recent", sub_matches)) => {
            let limit: i64 = sub_matches
                .get_one::<String>("limit")
                .and_then(|s| s.parse().ok())
                .unwrap_or(10);
            commands::recently_played(db_path, covers_dir, limit).await
        }
        Some(("info", sub_matches)) => {
            let id = sub_matches
                .get_one::<String>("id")
                .ok_or_else(|| anyhow::anyhow!("Book ID is required"))?;
            commands::show_book_info(db_path, covers_dir, id).await
        }
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}
