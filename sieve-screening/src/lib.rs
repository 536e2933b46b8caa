//! # sieve-screening
//!
//! Post-ranking screening support: the full-text scoring rubric,
//! dual-reviewer conflict detection and resolution, and bibliographic
//! duplicate detection.

pub mod conflict;
pub mod duplicates;
pub mod rubric;

pub use conflict::{
    detect_conflicts, resolve_by_consensus, resolve_conflict, Conflict, ConflictStatus,
    ResolutionStrategy, ReviewerPosition,
};
pub use duplicates::{find_duplicates, DuplicateGroup, ReferenceBibData};
pub use rubric::{date_range_subscore, score_full_text, Criterion, ScreeningRecord, Subscores, RUBRIC};
