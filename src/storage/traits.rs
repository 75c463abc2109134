//! Storage traits and error types
//!
//! This module defines the trait interface for result sinks and
//! associated error types.

use crate::enrichment::EnrichmentRecord;
use crate::extraction::AnalysisResult;
use crate::pipeline::AnalysisMode;
use crate::state::SubjectKey;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Persistence sink for pipeline results
///
/// The pipeline only writes through this trait; reading back is limited
/// to enrichment records for cache warm-up.
pub trait RecordStore {
    /// Stores a completed analysis
    ///
    /// # Returns
    ///
    /// The row ID of the stored analysis
    fn save_analysis(
        &mut self,
        site_url: &str,
        mode: AnalysisMode,
        result: &AnalysisResult,
    ) -> StorageResult<i64>;

    /// Stores an enrichment record, replacing any previous one for the key
    fn save_enrichment(&mut self, key: &SubjectKey, record: &EnrichmentRecord)
        -> StorageResult<()>;

    /// Loads every stored enrichment record
    fn load_enrichments(&self) -> StorageResult<Vec<(SubjectKey, EnrichmentRecord)>>;

    /// Number of stored analyses for a site
    fn count_analyses(&self, site_url: &str) -> StorageResult<u64>;
}
