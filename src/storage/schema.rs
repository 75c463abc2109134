//! Database schema definitions
//!
//! This module contains the SQL schema for the site-intel results database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per completed website analysis
CREATE TABLE IF NOT EXISTS website_analysis (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    site_url TEXT NOT NULL,
    mode TEXT NOT NULL,
    confidence_score REAL NOT NULL,
    result_json TEXT NOT NULL,
    config_hash TEXT,
    analyzed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_website_analysis_site ON website_analysis(site_url);

-- Latest enrichment record per subject key
CREATE TABLE IF NOT EXISTS company_enrichment (
    subject_key TEXT PRIMARY KEY,
    website_url TEXT NOT NULL,
    linkedin_url TEXT,
    record_json TEXT NOT NULL,
    error_count INTEGER NOT NULL DEFAULT 0,
    enriched_at TEXT NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
