use serde::{Deserialize, Serialize};

use super::defaults;

/// LLM arbitration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbiterConfig {
    /// Worker-pool size for concurrent arbiter calls. Clamped to
    /// [1, MAX_ARBITER_CONCURRENCY] at use.
    pub concurrency: usize,
    /// Retry budget for retryable provider errors.
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub request_timeout_secs: u64,
    pub max_completion_tokens: u32,
    pub temperature: f32,
    /// Model name passed to the provider and recorded in usage events.
    pub model: String,
    /// OpenAI-compatible endpoint base URL (feature `remote`).
    pub base_url: String,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            concurrency: defaults::DEFAULT_ARBITER_CONCURRENCY,
            max_retries: defaults::DEFAULT_MAX_RETRIES,
            initial_backoff_ms: defaults::DEFAULT_INITIAL_BACKOFF_MS,
            max_backoff_ms: defaults::DEFAULT_MAX_BACKOFF_MS,
            request_timeout_secs: defaults::DEFAULT_REQUEST_TIMEOUT_SECS,
            max_completion_tokens: defaults::DEFAULT_MAX_COMPLETION_TOKENS,
            temperature: defaults::DEFAULT_TEMPERATURE,
            model: defaults::DEFAULT_LLM_MODEL.to_string(),
            base_url: defaults::DEFAULT_LLM_BASE_URL.to_string(),
        }
    }
}
