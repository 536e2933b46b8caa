//! Batch results: decisions, isolated failures, and the run summary.

use serde::Serialize;
use sieve_core::{ClassificationMode, Decision};
use sieve_ranking::ScoreStatistics;

/// A reference the batch could not decide.
///
/// Failures are isolated per reference; the caller chooses whether to
/// re-submit them in a later batch.
#[derive(Debug, Clone, Serialize)]
pub struct FailedReference {
    pub reference_id: String,
    pub error: String,
    /// Set when the retry budget ran out and a human has to look instead.
    pub needs_manual_review: bool,
}

/// Aggregate view of one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    /// References processed, after duplicate-id removal.
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub included: usize,
    pub excluded: usize,
    pub maybe: usize,
    /// References dispatched to the LLM arbiter.
    pub arbitrated: usize,
    pub cancelled: bool,
    /// Score distribution; embedding mode only.
    pub statistics: Option<ScoreStatistics>,
    pub duration_ms: u64,
    pub mode: ClassificationMode,
    pub embedding_provider: Option<String>,
    pub llm_model: Option<String>,
}

/// Everything a batch run produced.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    /// Decisions in original batch order.
    pub succeeded: Vec<Decision>,
    pub failed: Vec<FailedReference>,
    pub summary: BatchSummary,
}
