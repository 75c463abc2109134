//! Running counters for a batch run

use serde::Serialize;

/// Success and failure counts for one source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceCounter {
    pub success: usize,
    pub failures: usize,
}

impl SourceCounter {
    pub fn record(&mut self, ok: bool) {
        if ok {
            self.success += 1;
        } else {
            self.failures += 1;
        }
    }

    pub fn attempts(&self) -> usize {
        self.success + self.failures
    }
}

/// Batch statistics summary
///
/// `successful` and `failed` count subjects; a subject only fails when its
/// enrichment call failed outright. Source counters only move for sources
/// that were actually attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    /// Number of subjects submitted
    pub total: usize,

    /// Subjects whose enrichment returned a record
    pub successful: usize,

    /// Subjects whose enrichment failed outright
    pub failed: usize,

    pub company_website: SourceCounter,
    pub linkedin_company: SourceCounter,
    pub linkedin_profile: SourceCounter,
}

impl BatchStats {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Subjects handled so far
    pub fn processed(&self) -> usize {
        self.successful + self.failed
    }

    /// Fraction of processed subjects that succeeded, 0.0 before any
    pub fn success_rate(&self) -> f64 {
        match self.processed() {
            0 => 0.0,
            n => self.successful as f64 / n as f64,
        }
    }
}
