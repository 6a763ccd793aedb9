//! Example 03: Storage Backends
//!
//! The same store logic runs over any provider: in-memory, one JSON file
//! per key, or a SQLite database. Durable backends survive a reopen.
//!
//! Run with: cargo run --example 03_backends

use eyre::Result;
use projstore::{Backend, FileStorage, MemoryStorage, Project, ProjectFilter, ProjectStore, open_provider};

fn main() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;

    println!("projstore Backends Example");
    println!("==========================\n");
    println!("Data directory: {}\n", temp_dir.path().display());

    // File backend: one JSON file per storage key
    println!("1. File backend...");
    let file_dir = temp_dir.path().join("file-data");
    {
        let mut store = ProjectStore::new(Box::new(FileStorage::open(&file_dir)?));
        store.save(Project::new("Durable", "Acme Corp", "2026-01-01", "2026-03-31"))?;
    }
    let mut store = ProjectStore::new(Box::new(FileStorage::open(&file_dir)?));
    let survivors = store.list(&ProjectFilter::default())?;
    println!("   After reopen: {} project(s)\n", survivors.len());

    // SQLite backend, opened through the factory
    println!("2. SQLite backend via open_provider...");
    let sqlite_dir = temp_dir.path().join("sqlite-data");
    {
        let mut store = ProjectStore::new(open_provider(Backend::Sqlite, &sqlite_dir)?);
        store.save(Project::new("Queryable", "Globex", "2026-02-01", "2026-06-30"))?;
    }
    let mut store = ProjectStore::new(open_provider(Backend::Sqlite, &sqlite_dir)?);
    let survivors = store.list(&ProjectFilter::default())?;
    println!("   After reopen: {} project(s)\n", survivors.len());

    // Memory backend keeps nothing once the store is dropped
    println!("3. Memory backend...");
    {
        let mut store = ProjectStore::new(Box::new(MemoryStorage::new()));
        store.save(Project::new("Ephemeral", "Initech", "2026-03-01", "2026-03-31"))?;
    }
    let mut store = ProjectStore::new(Box::new(MemoryStorage::new()));
    let survivors = store.list(&ProjectFilter::default())?;
    println!("   After a fresh open: {} project(s)", survivors.len());

    println!("\nExample complete.");
    Ok(())
}
