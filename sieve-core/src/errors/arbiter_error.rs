/// LLM arbitration errors.
#[derive(Debug, thiserror::Error)]
pub enum ArbiterError {
    /// Provider signalled rate limiting. Retryable with backoff.
    #[error("rate limited by provider (retry_after_ms: {retry_after_ms:?})")]
    RateLimited { retry_after_ms: Option<u64> },

    /// Request exceeded its deadline. Retryable.
    #[error("request timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// Transport-level failure (connection refused, DNS, TLS). Retryable.
    #[error("network error: {reason}")]
    Network { reason: String },

    /// Provider rejected the request outright (auth, bad request). Not retryable.
    #[error("request failed with status {status}: {reason}")]
    RequestFailed { status: u16, reason: String },

    /// Reply did not contain a parseable verdict.
    #[error("invalid response: {reason}")]
    InvalidResponse { reason: String },

    #[error("llm provider unavailable ({provider}): {reason}")]
    ProviderUnavailable { provider: String, reason: String },

    /// The retry budget ran out. The affected reference needs manual review.
    #[error("all {attempts} attempts failed, last error: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}

impl ArbiterError {
    /// Whether the retry combinator may try again after this error.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Timeout { .. } | Self::Network { .. }
        )
    }
}
