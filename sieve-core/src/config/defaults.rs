//! Default values for every config section.

use crate::constants;

// Embedding
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = constants::DEFAULT_EMBEDDING_DIMENSIONS;
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3_600;

// Cutoff detection
pub const DEFAULT_FLATNESS_EPSILON: f64 = 0.02;
pub const DEFAULT_INCLUDE_BAND: f64 = 0.30;
pub const DEFAULT_EXCLUDE_BAND: f64 = 0.10;

// Arbitration
pub const DEFAULT_ARBITER_CONCURRENCY: usize = 5;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 500;
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 30_000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_COMPLETION_TOKENS: u32 = 1_024;
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_LLM_MODEL: &str = "llama3.1";
pub const DEFAULT_LLM_BASE_URL: &str = "http://localhost:11434/v1";

// Full-text screening
pub const DEFAULT_INCLUDE_THRESHOLD: u8 = 7;
pub const DEFAULT_TITLE_SIMILARITY: f64 = 0.85;
pub const DEFAULT_TITLE_SIMILARITY_WITH_AUTHORS: f64 = 0.75;
pub const DEFAULT_TITLE_SIMILARITY_WITH_YEAR: f64 = 0.80;
pub const DEFAULT_AUTHOR_OVERLAP: f64 = 0.5;

// Triage
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;
