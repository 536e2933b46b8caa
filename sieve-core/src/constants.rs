/// Sieve engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of items in the PRISMA 2020 checklist.
pub const PRISMA_ITEM_COUNT: usize = 27;

/// Minimum ranking size for cutoff inference. Smaller batches are all gray zone.
pub const MIN_CUTOFF_BATCH: usize = 5;

/// Maximum total score of the full-text rubric.
pub const FULLTEXT_MAX_SCORE: u8 = 12;

/// Hard cap on concurrent arbiter calls.
pub const MAX_ARBITER_CONCURRENCY: usize = 10;

/// Default embedding dimensionality (MiniLM-class sentence models).
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;
