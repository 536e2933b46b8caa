use serde::{Deserialize, Serialize};

/// How a batch gets classified. Closed set: provider selection is an enum
/// match, never string dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMode {
    /// Embedding ranking with cutoff detection; the gray zone is arbitrated
    /// by the LLM when fallback is enabled.
    #[default]
    Embedding,
    /// Every reference goes straight to the LLM arbiter.
    Llm,
}
