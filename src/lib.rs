// projstore - project-tracking records over pluggable local key-value storage

pub mod config;
pub mod filter;
pub mod models;
pub mod storage;
pub mod store;

// Re-export main types for convenience
pub use config::Config;
pub use filter::{OrderBy, OrderDirection, ProjectFilter};
pub use models::{Project, parse_date_ms};
pub use storage::{
    Backend, FileStorage, MemoryStorage, SqliteStorage, StorageProvider, open_provider,
};
pub use store::ProjectStore;
