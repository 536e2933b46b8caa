//! ILlmProvider, the chat-completion interface the arbiter calls through.
//!
//! Implementations must be cheap to clone behind an `Arc`; the triage layer
//! fans out concurrent calls from spawned tasks, so returned futures carry a
//! `Send` bound.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::errors::ArbiterError;

/// A single chat-completion request: a system/user prompt pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    /// Arbitration wants near-deterministic output; keep this low.
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Token counts as reported by the provider, when it reports them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The provider's reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub text: String,
    pub usage: Option<TokenUsage>,
}

/// Chat-completion provider used for arbitration.
pub trait ILlmProvider: Send + Sync {
    /// Send one completion request.
    fn complete(
        &self,
        request: ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, ArbiterError>> + Send;

    /// Provider name recorded in usage events.
    fn name(&self) -> &str;

    /// Model identifier reported in usage events.
    fn model(&self) -> &str;

    /// Whether this provider is currently reachable.
    fn is_available(&self) -> bool;
}
