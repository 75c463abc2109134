//! Storage module for persisting pipeline results
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Analysis persistence
//! - Enrichment persistence and reload for cache warm-up

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{RecordStore, StorageError, StorageResult};

use crate::state::EnrichmentCache;
use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::new(path)
}

/// Loads stored enrichment records into the cache
///
/// # Returns
///
/// Number of records added; existing cache entries are kept.
pub async fn warm_cache(store: &dyn RecordStore, cache: &EnrichmentCache) -> StorageResult<usize> {
    let records = store.load_enrichments()?;
    Ok(cache.warm(records).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::EnrichmentRecord;
    use crate::state::SubjectKey;

    #[tokio::test]
    async fn test_warm_cache() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let key = SubjectKey::new("https://acme.test/", None);
        let record = EnrichmentRecord {
            description: Some("Widgets".to_string()),
            ..Default::default()
        };
        storage.save_enrichment(&key, &record).unwrap();

        let cache = EnrichmentCache::new();
        assert_eq!(warm_cache(&storage, &cache).await.unwrap(), 1);
        assert_eq!(cache.get(&key).await, Some(record));
    }
}
