//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the `RecordStore` trait.
//! Results are stored as JSON bodies next to a few indexed columns.

use crate::enrichment::EnrichmentRecord;
use crate::extraction::AnalysisResult;
use crate::pipeline::AnalysisMode;
use crate::state::SubjectKey;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{RecordStore, StorageResult};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
    config_hash: Option<String>,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn,
            config_hash: None,
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn,
            config_hash: None,
        })
    }

    /// Tags stored analyses with the hash of the config that produced them
    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }
}

impl RecordStore for SqliteStorage {
    fn save_analysis(
        &mut self,
        site_url: &str,
        mode: AnalysisMode,
        result: &AnalysisResult,
    ) -> StorageResult<i64> {
        let body = serde_json::to_string(result)?;
        self.conn.execute(
            "INSERT INTO website_analysis
                (site_url, mode, confidence_score, result_json, config_hash, analyzed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                site_url,
                mode.as_str(),
                result.confidence_score,
                body,
                self.config_hash,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn save_enrichment(
        &mut self,
        key: &SubjectKey,
        record: &EnrichmentRecord,
    ) -> StorageResult<()> {
        let body = serde_json::to_string(record)?;
        self.conn.execute(
            "INSERT INTO company_enrichment
                (subject_key, website_url, linkedin_url, record_json, error_count, enriched_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(subject_key) DO UPDATE SET
                record_json = excluded.record_json,
                error_count = excluded.error_count,
                enriched_at = excluded.enriched_at",
            params![
                key.to_string(),
                key.website_url,
                key.linkedin_url,
                body,
                record.scraping_errors.len() as i64,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(())
    }

    fn load_enrichments(&self) -> StorageResult<Vec<(SubjectKey, EnrichmentRecord)>> {
        let mut stmt = self.conn.prepare(
            "SELECT website_url, linkedin_url, record_json FROM company_enrichment
             ORDER BY enriched_at",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut records = Vec::with_capacity(rows.len());
        for (website_url, linkedin_url, body) in rows {
            match serde_json::from_str::<EnrichmentRecord>(&body) {
                Ok(record) => records.push((
                    SubjectKey::new(&website_url, linkedin_url.as_deref()),
                    record,
                )),
                Err(e) => tracing::warn!("Skipping unreadable enrichment for {}: {}", website_url, e),
            }
        }

        Ok(records)
    }

    fn count_analyses(&self, site_url: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM website_analysis WHERE site_url = ?1",
            params![site_url],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
