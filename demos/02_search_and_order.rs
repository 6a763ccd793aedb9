//! Example 02: Filtering, Ordering and Search History
//!
//! Narrow a listing to favorites, order it by name or date, and search by
//! name. Every name search lands in the bounded search history.
//!
//! Run with: cargo run --example 02_search_and_order

use eyre::Result;
use projstore::{MemoryStorage, OrderBy, OrderDirection, Project, ProjectFilter, ProjectStore};

fn main() -> Result<()> {
    println!("projstore Search and Order Example");
    println!("==================================\n");

    let mut store = ProjectStore::new(Box::new(MemoryStorage::new()));

    println!("Seeding projects...");
    for (name, client, start, end, favorited) in [
        ("Brand redesign", "Acme Corp", "2026-03-01", "2026-07-15", true),
        ("app rollout", "Globex", "2026-01-10", "2026-04-30", false),
        ("Audit 2026", "Initech", "2025-11-20", "2026-02-28", true),
        ("Site redesign", "Hooli", "2026-05-01", "2026-09-30", false),
    ] {
        let mut project = Project::new(name, client, start, end);
        project.favorited = favorited;
        store.save(project)?;
    }

    println!("\n1. Favorites only:");
    let favorites = store.list(&ProjectFilter {
        favorited: Some(true),
        ..Default::default()
    })?;
    for project in &favorites {
        println!("   {}", project.name);
    }

    println!("\n2. Ordered by name (case-insensitive):");
    let by_name = store.list(&ProjectFilter {
        order_by: Some(OrderBy::Name),
        ..Default::default()
    })?;
    for project in &by_name {
        println!("   {}", project.name);
    }

    println!("\n3. Ordered by start date, newest first:");
    let by_start = store.list(&ProjectFilter {
        order_by: Some(OrderBy::StartDate),
        order_direction: Some(OrderDirection::Desc),
        ..Default::default()
    })?;
    for project in &by_start {
        println!("   {}  {}", project.start_date, project.name);
    }

    println!("\n4. Searching names for \"redesign\":");
    let hits = store.list(&ProjectFilter {
        name: Some("redesign".to_string()),
        ..Default::default()
    })?;
    for project in &hits {
        println!("   {}", project.name);
    }

    // A second search, so the history below has two entries
    store.list(&ProjectFilter {
        name: Some("audit".to_string()),
        ..Default::default()
    })?;

    println!("\n5. Search history (most recent first):");
    for term in store.search_history()? {
        println!("   {}", term);
    }

    println!("\nExample complete.");
    Ok(())
}
