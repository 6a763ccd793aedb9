// Project store over a flat key-value provider

use crate::filter::ProjectFilter;
use crate::models::Project;
use crate::storage::StorageProvider;
use eyre::{Context, Result};
use tracing::{debug, warn};

/// Storage key holding the JSON-array-encoded project collection
const PROJECTS_KEY: &str = "projects";
/// Storage key holding the JSON-array-encoded search history
const SEARCH_HISTORY_KEY: &str = "searchHistory";
/// The most-recent-first search history keeps at most this many terms
const SEARCH_HISTORY_LIMIT: usize = 5;

/// Sole mediator between in-memory project values and the persistence
/// provider.
///
/// The whole collection lives as one serialized list under a single storage
/// key: every mutation reads the full list, changes it in memory and writes
/// the full list back. Construct one store at application start and pass it
/// to consumers; there is no global instance. The read-modify-write cycle is
/// not safe against concurrent writers: two processes interleaving
/// mutations can lose updates.
pub struct ProjectStore {
    provider: Box<dyn StorageProvider>,
}

impl ProjectStore {
    pub fn new(provider: Box<dyn StorageProvider>) -> Self {
        Self { provider }
    }

    /// Read access to the underlying provider
    pub fn provider(&self) -> &dyn StorageProvider {
        self.provider.as_ref()
    }

    /// Append `project` to the collection and persist it. Returns the
    /// updated collection. Ids are not checked for uniqueness; saving a
    /// duplicate id keeps both records.
    pub fn save(&mut self, project: Project) -> Result<Vec<Project>> {
        let mut projects = self.read_projects()?;
        projects.push(project);
        self.write_projects(&projects)?;
        debug!(count = projects.len(), "saved project");
        Ok(projects)
    }

    /// List the collection through `filter`: favorite-equality filter, then
    /// ordering, then case-insensitive name search, in that fixed order.
    ///
    /// Does not mutate the stored collection. A non-empty name search also
    /// records the term into search history, which is why listing takes
    /// `&mut self`.
    pub fn list(&mut self, filter: &ProjectFilter) -> Result<Vec<Project>> {
        let projects = self.read_projects()?;
        let results = filter.apply(projects);
        if let Some(term) = filter.search_term() {
            self.record_search_history(term)?;
        }
        Ok(results)
    }

    /// Find one project by id (first match wins). Absence is not an error.
    pub fn get_by_id(&self, id: &str) -> Result<Option<Project>> {
        let projects = self.read_projects()?;
        Ok(projects.into_iter().find(|p| p.id == id))
    }

    /// Replace the record carrying `project`'s id in place (position
    /// preserved) and persist the collection.
    ///
    /// Returns `Ok(None)` without writing anything when no record has that
    /// id.
    pub fn update(&mut self, project: Project) -> Result<Option<Project>> {
        let mut projects = self.read_projects()?;
        let Some(slot) = projects.iter_mut().find(|p| p.id == project.id) else {
            debug!(id = %project.id, "update target not found");
            return Ok(None);
        };
        *slot = project.clone();
        self.write_projects(&projects)?;
        debug!(id = %project.id, "updated project");
        Ok(Some(project))
    }

    /// Remove every record with this id and persist the remainder, which is
    /// returned.
    pub fn delete(&mut self, id: &str) -> Result<Vec<Project>> {
        let mut projects = self.read_projects()?;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        if projects.len() == before {
            warn!(id, "delete matched no project");
        }
        self.write_projects(&projects)?;
        debug!(id, remaining = projects.len(), "deleted project");
        Ok(projects)
    }

    /// Record a search term at the front of the bounded history.
    ///
    /// A term already present anywhere in the history is a complete no-op:
    /// nothing moves, nothing is evicted, nothing is written. A genuinely
    /// new term evicts the oldest entry when the history is at capacity.
    pub fn record_search_history(&mut self, term: &str) -> Result<()> {
        let mut history = self.read_history()?;
        if history.iter().any(|t| t == term) {
            return Ok(());
        }
        if history.len() >= SEARCH_HISTORY_LIMIT {
            history.truncate(SEARCH_HISTORY_LIMIT - 1);
        }
        history.insert(0, term.to_string());

        let raw = serde_json::to_string(&history).context("Failed to serialize search history")?;
        self.provider.set(SEARCH_HISTORY_KEY, &raw)?;
        debug!(term, count = history.len(), "recorded search term");
        Ok(())
    }

    /// The stored search history, most recent first
    pub fn search_history(&self) -> Result<Vec<String>> {
        self.read_history()
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn read_projects(&self) -> Result<Vec<Project>> {
        match self.provider.get(PROJECTS_KEY)? {
            Some(raw) => serde_json::from_str(&raw).context("Failed to parse stored projects"),
            None => Ok(Vec::new()),
        }
    }

    fn write_projects(&mut self, projects: &[Project]) -> Result<()> {
        let raw = serde_json::to_string(projects).context("Failed to serialize projects")?;
        self.provider.set(PROJECTS_KEY, &raw)
    }

    fn read_history(&self) -> Result<Vec<String>> {
        match self.provider.get(SEARCH_HISTORY_KEY)? {
            Some(raw) => {
                serde_json::from_str(&raw).context("Failed to parse stored search history")
            }
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{OrderBy, OrderDirection};
    use crate::storage::{FileStorage, MemoryStorage, SqliteStorage};
    use tempfile::TempDir;

    fn memory_store() -> ProjectStore {
        ProjectStore::new(Box::new(MemoryStorage::new()))
    }

    fn project(id: &str, name: &str) -> Project {
        Project {
            id: id.to_string(),
            name: name.to_string(),
            client: "Acme".to_string(),
            start_date: "2026-01-01".to_string(),
            end_date: "2026-06-30".to_string(),
            image_url: None,
            favorited: false,
        }
    }

    fn ids(projects: &[Project]) -> Vec<&str> {
        projects.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_save_appends_and_returns_collection() {
        let mut store = memory_store();

        let after_first = store.save(project("p-1", "Alpha")).unwrap();
        assert_eq!(ids(&after_first), vec!["p-1"]);

        let after_second = store.save(project("p-2", "Beta")).unwrap();
        assert_eq!(ids(&after_second), vec!["p-1", "p-2"]);
    }

    #[test]
    fn test_get_by_id_absent_is_none() {
        let store = memory_store();
        assert_eq!(store.get_by_id("nope").unwrap(), None);
    }

    #[test]
    fn test_get_by_id_returns_latest_state() {
        let mut store = memory_store();
        store.save(project("p-1", "Original")).unwrap();

        let mut changed = project("p-1", "Renamed");
        changed.favorited = true;
        store.update(changed.clone()).unwrap();

        assert_eq!(store.get_by_id("p-1").unwrap(), Some(changed));
    }

    #[test]
    fn test_save_keeps_duplicate_ids() {
        let mut store = memory_store();
        store.save(project("p-1", "First")).unwrap();
        let all = store.save(project("p-1", "Second")).unwrap();

        assert_eq!(all.len(), 2);
        // First match wins on lookup
        assert_eq!(store.get_by_id("p-1").unwrap().unwrap().name, "First");
    }

    #[test]
    fn test_update_replaces_in_place() {
        let mut store = memory_store();
        store.save(project("p-1", "Alpha")).unwrap();
        store.save(project("p-2", "Beta")).unwrap();
        store.save(project("p-3", "Gamma")).unwrap();

        let replaced = store.update(project("p-2", "Beta v2")).unwrap();
        assert_eq!(replaced.unwrap().name, "Beta v2");

        let all = store.list(&ProjectFilter::default()).unwrap();
        assert_eq!(ids(&all), vec!["p-1", "p-2", "p-3"]);
        assert_eq!(all[1].name, "Beta v2");
    }

    #[test]
    fn test_update_missing_id_writes_nothing() {
        let mut store = memory_store();

        // Empty store: the projects key must stay absent
        assert_eq!(store.update(project("ghost", "Ghost")).unwrap(), None);
        assert_eq!(store.provider().get("projects").unwrap(), None);

        // Populated store: the stored payload must stay byte-for-byte equal
        store.save(project("p-1", "Alpha")).unwrap();
        let before = store.provider().get("projects").unwrap().unwrap();

        assert_eq!(store.update(project("ghost", "Ghost")).unwrap(), None);
        let after = store.provider().get("projects").unwrap().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_delete_then_get_is_none() {
        let mut store = memory_store();
        store.save(project("p-1", "Alpha")).unwrap();
        store.save(project("p-2", "Beta")).unwrap();

        let remaining = store.delete("p-1").unwrap();
        assert_eq!(ids(&remaining), vec!["p-2"]);
        assert_eq!(store.get_by_id("p-1").unwrap(), None);
    }

    #[test]
    fn test_delete_removes_every_match() {
        let mut store = memory_store();
        store.save(project("p-1", "First")).unwrap();
        store.save(project("p-1", "Second")).unwrap();
        store.save(project("p-2", "Keep")).unwrap();

        let remaining = store.delete("p-1").unwrap();
        assert_eq!(ids(&remaining), vec!["p-2"]);
    }

    #[test]
    fn test_list_on_empty_store() {
        let mut store = memory_store();
        assert!(store.list(&ProjectFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn test_list_favorited_subset() {
        let mut store = memory_store();
        let mut fav = project("fav", "Favored");
        fav.favorited = true;
        store.save(fav).unwrap();
        store.save(project("plain", "Plain")).unwrap();

        let filter = ProjectFilter {
            favorited: Some(true),
            ..Default::default()
        };
        assert_eq!(ids(&store.list(&filter).unwrap()), vec!["fav"]);

        let filter = ProjectFilter {
            favorited: Some(false),
            ..Default::default()
        };
        assert_eq!(ids(&store.list(&filter).unwrap()), vec!["plain"]);
    }

    #[test]
    fn test_list_orders_case_insensitively() {
        let mut store = memory_store();
        store.save(project("a", "Alpha")).unwrap();
        store.save(project("b", "beta")).unwrap();

        let filter = ProjectFilter {
            order_by: Some(OrderBy::Name),
            ..Default::default()
        };
        assert_eq!(ids(&store.list(&filter).unwrap()), vec!["a", "b"]);

        let filter = ProjectFilter {
            order_by: Some(OrderBy::Name),
            order_direction: Some(OrderDirection::Desc),
            ..Default::default()
        };
        assert_eq!(ids(&store.list(&filter).unwrap()), vec!["b", "a"]);
    }

    #[test]
    fn test_list_does_not_mutate_stored_collection() {
        let mut store = memory_store();
        store.save(project("b", "Beta")).unwrap();
        store.save(project("a", "Alpha")).unwrap();
        let before = store.provider().get("projects").unwrap().unwrap();

        let filter = ProjectFilter {
            order_by: Some(OrderBy::Name),
            name: Some("alp".to_string()),
            ..Default::default()
        };
        store.list(&filter).unwrap();

        let after = store.provider().get("projects").unwrap().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_list_name_search_records_history() {
        let mut store = memory_store();
        store.save(project("a", "Redesign")).unwrap();

        let filter = ProjectFilter {
            name: Some("design".to_string()),
            ..Default::default()
        };
        let results = store.list(&filter).unwrap();
        assert_eq!(ids(&results), vec!["a"]);
        assert_eq!(store.search_history().unwrap(), vec!["design"]);

        // No name, or an empty name, records nothing
        store.list(&ProjectFilter::default()).unwrap();
        let filter = ProjectFilter {
            name: Some(String::new()),
            ..Default::default()
        };
        store.list(&filter).unwrap();
        assert_eq!(store.search_history().unwrap(), vec!["design"]);
    }

    #[test]
    fn test_history_sequence_and_eviction() {
        let mut store = memory_store();
        for term in ["a", "b", "c", "d", "e"] {
            store.record_search_history(term).unwrap();
        }
        assert_eq!(store.search_history().unwrap(), vec!["e", "d", "c", "b", "a"]);

        // At capacity: a new term drops the oldest entry
        store.record_search_history("f").unwrap();
        assert_eq!(store.search_history().unwrap(), vec!["f", "e", "d", "c", "b"]);
    }

    #[test]
    fn test_history_duplicate_is_full_noop_at_capacity() {
        let mut store = memory_store();
        for term in ["a", "b", "c", "d", "e", "f"] {
            store.record_search_history(term).unwrap();
        }
        let before = store.provider().get("searchHistory").unwrap().unwrap();

        // "e" is present but not at the front: nothing moves, nothing is
        // evicted, nothing is written
        store.record_search_history("e").unwrap();
        assert_eq!(store.search_history().unwrap(), vec!["f", "e", "d", "c", "b"]);
        let after = store.provider().get("searchHistory").unwrap().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_history_duplicate_not_moved_to_front() {
        let mut store = memory_store();
        store.record_search_history("first").unwrap();
        store.record_search_history("second").unwrap();

        store.record_search_history("first").unwrap();
        assert_eq!(store.search_history().unwrap(), vec!["second", "first"]);
    }

    #[test]
    fn test_history_bounded_and_duplicate_free() {
        let mut store = memory_store();
        let terms = ["a", "b", "a", "c", "d", "b", "e", "f", "g", "a"];
        for term in terms {
            store.record_search_history(term).unwrap();
        }

        let history = store.search_history().unwrap();
        assert!(history.len() <= SEARCH_HISTORY_LIMIT);
        let mut unique = history.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), history.len());
    }

    #[test]
    fn test_malformed_projects_payload_errors() {
        let mut storage = MemoryStorage::new();
        storage.set("projects", "definitely not json").unwrap();
        let mut store = ProjectStore::new(Box::new(storage));

        assert!(store.list(&ProjectFilter::default()).is_err());
        assert!(store.get_by_id("p-1").is_err());
        assert!(store.save(project("p-1", "Alpha")).is_err());
        assert!(store.delete("p-1").is_err());
    }

    #[test]
    fn test_malformed_history_payload_errors() {
        let mut storage = MemoryStorage::new();
        storage.set("searchHistory", "{\"oops\":1}").unwrap();
        let mut store = ProjectStore::new(Box::new(storage));

        assert!(store.search_history().is_err());
        assert!(store.record_search_history("term").is_err());
    }

    #[test]
    fn test_file_backed_store_survives_reopen() {
        let temp = TempDir::new().unwrap();

        let mut store = ProjectStore::new(Box::new(FileStorage::open(temp.path()).unwrap()));
        store.save(project("p-1", "Durable")).unwrap();
        store.record_search_history("durable").unwrap();
        drop(store);

        let store = ProjectStore::new(Box::new(FileStorage::open(temp.path()).unwrap()));
        assert_eq!(store.get_by_id("p-1").unwrap().unwrap().name, "Durable");
        assert_eq!(store.search_history().unwrap(), vec!["durable"]);
    }

    #[test]
    fn test_sqlite_backed_store_survives_reopen() {
        let temp = TempDir::new().unwrap();

        let mut store = ProjectStore::new(Box::new(SqliteStorage::open(temp.path()).unwrap()));
        store.save(project("p-1", "Durable")).unwrap();
        drop(store);

        let store = ProjectStore::new(Box::new(SqliteStorage::open(temp.path()).unwrap()));
        assert_eq!(store.get_by_id("p-1").unwrap().unwrap().name, "Durable");
    }
}
