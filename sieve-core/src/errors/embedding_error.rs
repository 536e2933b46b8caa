/// Embedding subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// Warm-up or inference found the model unusable. Screening must not
    /// start against a provider in this state.
    #[error("embedding model unavailable ({provider}): {reason}")]
    ModelUnavailable { provider: String, reason: String },

    #[error("model load failed at {path}: {reason}")]
    ModelLoadFailed { path: String, reason: String },

    #[error("inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
