use sieve_core::errors::ArbiterError;
use sieve_core::traits::{ChatRequest, ChatResponse, ILlmProvider};

/// Provider for embedding-only deployments.
///
/// Never available, and every call fails, so a misconfigured LLM fallback
/// is loud instead of silently classifying nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProvider;

impl ILlmProvider for NullProvider {
    async fn complete(&self, _request: ChatRequest) -> Result<ChatResponse, ArbiterError> {
        Err(ArbiterError::ProviderUnavailable {
            provider: "null".to_string(),
            reason: "no LLM provider configured".to_string(),
        })
    }

    fn name(&self) -> &str {
        "null"
    }

    fn model(&self) -> &str {
        "none"
    }

    fn is_available(&self) -> bool {
        false
    }
}
