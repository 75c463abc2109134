use crate::enrichment::EnrichmentRecord;
use std::collections::HashMap;
use std::fmt;
use tokio::sync::RwLock;

/// Composite cache key of an enrichment subject
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubjectKey {
    pub website_url: String,
    pub linkedin_url: Option<String>,
}

impl SubjectKey {
    /// Builds a key from the caller's inputs; blank company-network URLs
    /// are treated as absent
    pub fn new(website_url: &str, linkedin_url: Option<&str>) -> Self {
        Self {
            website_url: website_url.trim().to_string(),
            linkedin_url: linkedin_url
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }

    /// Parses the `website|linkedin` form produced by `Display`
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('|') {
            Some((website, linkedin)) => Self::new(website, Some(linkedin)),
            None => Self::new(raw, None),
        }
    }
}

impl fmt::Display for SubjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}",
            self.website_url,
            self.linkedin_url.as_deref().unwrap_or("")
        )
    }
}

/// In-memory enrichment cache
///
/// No eviction: entries live as long as the process.
#[derive(Debug, Default)]
pub struct EnrichmentCache {
    entries: RwLock<HashMap<SubjectKey, EnrichmentRecord>>,
}

impl EnrichmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &SubjectKey) -> Option<EnrichmentRecord> {
        self.entries.read().await.get(key).cloned()
    }

    /// Stores a record, replacing any previous entry for the key
    pub async fn set(&self, key: SubjectKey, record: EnrichmentRecord) {
        self.entries.write().await.insert(key, record);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Loads previously persisted records without overwriting newer ones
    pub async fn warm<I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = (SubjectKey, EnrichmentRecord)>,
    {
        let mut entries = self.entries.write().await;
        let mut loaded = 0;
        for (key, record) in records {
            if let std::collections::hash_map::Entry::Vacant(slot) = entries.entry(key) {
                slot.insert(record);
                loaded += 1;
            }
        }
        tracing::info!("Warmed enrichment cache with {} records", loaded);
        loaded
    }
}
