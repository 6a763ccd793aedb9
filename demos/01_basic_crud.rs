//! Example 01: Basic CRUD Operations
//!
//! Save, fetch, update and delete project records against an in-memory
//! storage provider.
//!
//! Run with: cargo run --example 01_basic_crud

use eyre::Result;
use projstore::{MemoryStorage, Project, ProjectStore};

fn main() -> Result<()> {
    println!("projstore Basic CRUD Example");
    println!("============================\n");

    let mut store = ProjectStore::new(Box::new(MemoryStorage::new()));

    // SAVE: add a project
    println!("1. SAVE - Adding a project...");
    let mut project = Project::new("Website relaunch", "Acme Corp", "2026-02-01", "2026-05-31");
    project.favorited = true;
    let id = project.id.clone();
    let all = store.save(project)?;
    println!("   Saved project {} ({} in store)\n", id, all.len());

    // GET: fetch it back by id
    println!("2. GET - Fetching it back...");
    match store.get_by_id(&id)? {
        Some(project) => println!("   Found: {} for {}\n", project.name, project.client),
        None => println!("   Not found!\n"),
    }

    // UPDATE: replace the record in place
    println!("3. UPDATE - Renaming it...");
    if let Some(mut changed) = store.get_by_id(&id)? {
        changed.name = "Website relaunch (phase 2)".to_string();
        match store.update(changed)? {
            Some(project) => println!("   Now called: {}\n", project.name),
            None => println!("   Vanished!\n"),
        }
    }

    // UPDATE on an id the store has never seen writes nothing
    println!("4. UPDATE MISS - Updating an unknown id...");
    let ghost = Project::new("Ghost", "Nobody", "2026-01-01", "2026-01-02");
    println!("   Result: {:?}\n", store.update(ghost)?.map(|p| p.name));

    // DELETE: remove it and get the remainder back
    println!("5. DELETE - Removing it...");
    let remaining = store.delete(&id)?;
    println!("   {} project(s) remain", remaining.len());
    println!("   get_by_id now yields {:?}", store.get_by_id(&id)?);

    println!("\nExample complete.");
    Ok(())
}
