//! # sieve-triage
//!
//! Batch orchestration over the whole pipeline: embed, rank, cut, then
//! arbitrate the gray zone. Re-exports the user-facing types of the
//! layers below so most callers depend on this crate alone.

pub mod cancel;
pub mod engine;
pub mod options;
pub mod outcome;

pub use cancel::CancelFlag;
pub use engine::TriageEngine;
pub use options::BatchOptions;
pub use outcome::{BatchOutcome, BatchSummary, FailedReference};

pub use sieve_arbiter::{ArbiterEngine, NullProvider};
pub use sieve_core::models::SimilarityScore;
pub use sieve_core::{
    ClassificationMode, Confidence, Decision, DecisionLabel, DecisionSource, Protocol, Reference,
    SieveConfig, SieveError, SieveResult, Stage, TemporalRange,
};
pub use sieve_embeddings::EmbeddingEngine;
pub use sieve_ranking::{detect_cutoff, CutoffMethod, CutoffResult, ScoreStatistics};

#[cfg(feature = "remote")]
pub use sieve_arbiter::OpenAiProvider;
