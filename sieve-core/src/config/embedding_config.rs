use serde::{Deserialize, Serialize};

use super::defaults;

/// Which embedding backend to load. Closed set, matched exhaustively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProviderKind {
    /// Deterministic hashed term-frequency vectors. Always available.
    #[default]
    Hashed,
    /// Local transformer model via ONNX Runtime (feature `onnx`).
    Onnx,
}

/// Embedding subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub kind: EmbeddingProviderKind,
    pub dimensions: usize,
    /// Path to a local ONNX model. Required when `kind` is `Onnx`.
    pub model_path: Option<String>,
    /// L1 cache capacity (entries).
    pub cache_capacity: u64,
    /// L1 cache time-to-live (seconds).
    pub cache_ttl_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            kind: EmbeddingProviderKind::Hashed,
            dimensions: defaults::DEFAULT_EMBEDDING_DIMENSIONS,
            model_path: None,
            cache_capacity: defaults::DEFAULT_CACHE_CAPACITY,
            cache_ttl_secs: defaults::DEFAULT_CACHE_TTL_SECS,
        }
    }
}
