//! # sieve-ledger
//!
//! PRISMA 2020 compliance ledger: 27 checklist items per project, a
//! provenance state machine per item, and a one-way lock once the review
//! is final. Storage-agnostic; mutations return the updated item for the
//! caller to persist.

pub mod engine;
pub mod item;
pub mod populate;

pub use engine::{ComplianceLock, LedgerEngine, LedgerStats};
pub use item::{ContentType, PrismaItem};
pub use populate::ReviewSummary;
