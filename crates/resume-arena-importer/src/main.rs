//! Resume Arena Importer - Seeds the database from a directory of PDFs.
//!
//! Counterpart of the upload flow for system-seeded content: every PDF in
//! the source directory becomes a resume with no owner. File names that are
//! already registered are skipped, so the import can be re-run safely.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use resume_arena::config::ArenaConfig;
use resume_arena::db;
use resume_arena::store::SqliteStore;

/// Resume Arena Importer - seeds resumes from a directory.
#[derive(Parser)]
#[command(name = "resume-arena-importer")]
#[command(about = "Imports a directory of PDF resumes as seeded items")]
struct Args {
    /// Path to the SQLite database (defaults to the configured one)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Directory containing PDF files to import
    #[arg(long, default_value = "seed")]
    dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config = ArenaConfig::load()?;
    let db_path = args.db.unwrap_or_else(|| config.database.clone());
    tracing::info!("Database: {:?}", db_path);
    tracing::info!("Source directory: {:?}", args.dir);

    if let Some(data_dir) = db_path.parent() {
        std::fs::create_dir_all(data_dir)?;
    }
    let db = db::init_db(&db_path)?;
    let store = SqliteStore::new(db);

    let imported = import_dir(&store, &args.dir, config.rating.initial_rating)?;
    tracing::info!("Successfully imported {} resumes", imported);
    Ok(())
}

/// Import every `.pdf` file in `dir` as a seeded resume.
///
/// Returns the number of newly created resumes; already-registered file
/// names are counted as skipped, not as failures.
fn import_dir(store: &SqliteStore, dir: &Path, initial_rating: i32) -> anyhow::Result<usize> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read source directory {}", dir.display()))?;

    let mut imported = 0;
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_string();
        if !file_name.to_lowercase().ends_with(".pdf") {
            continue;
        }

        if store.find_by_file_name(&file_name)?.is_some() {
            tracing::debug!("Skipping already imported {}", file_name);
            continue;
        }

        store.create(None, &file_name, &file_name, initial_rating)?;
        tracing::info!("Imported {}", file_name);
        imported += 1;
    }

    Ok(imported)
}
