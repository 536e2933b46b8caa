//! OpenAI-compatible chat-completions provider.
//!
//! Works against any endpoint speaking the `/chat/completions` shape:
//! Ollama, vLLM, or OpenAI itself. Enabled by the `remote` feature.
//! Availability tracks the last observed transport health: a network
//! failure or timeout marks the provider unhealthy until a call succeeds
//! again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sieve_core::config::ArbiterConfig;
use sieve_core::errors::ArbiterError;
use sieve_core::traits::{ChatRequest, ChatResponse, ILlmProvider, TokenUsage};
use tracing::debug;

pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    timeout_ms: u64,
    healthy: AtomicBool,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct WireReplyMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireReplyMessage,
}

#[derive(Deserialize, Default)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[derive(Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

impl OpenAiProvider {
    /// Build a provider from config. The API key is optional because
    /// local endpoints (Ollama, vLLM) usually run without one.
    pub fn new(config: &ArbiterConfig, api_key: Option<String>) -> Result<Self, ArbiterError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ArbiterError::ProviderUnavailable {
                provider: "openai-compatible".to_string(),
                reason: format!("http client build failed: {e}"),
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            timeout_ms: config.request_timeout_secs * 1_000,
            healthy: AtomicBool::new(true),
        })
    }

    fn classify_status(status: u16, body: String, retry_after_ms: Option<u64>) -> ArbiterError {
        match status {
            429 => ArbiterError::RateLimited { retry_after_ms },
            500..=599 => ArbiterError::Network {
                reason: format!("server error {status}: {body}"),
            },
            _ => ArbiterError::RequestFailed {
                status,
                reason: body,
            },
        }
    }
}

impl ILlmProvider for OpenAiProvider {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ArbiterError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = WireRequest {
            model: &self.model,
            messages: vec![
                WireMessage {
                    role: "system",
                    content: &request.system,
                },
                WireMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let mut builder = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            self.healthy.store(false, Ordering::Relaxed);
            if e.is_timeout() {
                ArbiterError::Timeout {
                    elapsed_ms: self.timeout_ms,
                }
            } else {
                ArbiterError::Network {
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_ms = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs.saturating_mul(1_000));
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_status(status.as_u16(), body, retry_after_ms));
        }

        let wire: WireResponse =
            response
                .json()
                .await
                .map_err(|e| ArbiterError::InvalidResponse {
                    reason: format!("malformed completion payload: {e}"),
                })?;

        let text = wire
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ArbiterError::InvalidResponse {
                reason: "completion had no choices".to_string(),
            })?;
        let usage = wire.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        self.healthy.store(true, Ordering::Relaxed);
        debug!(chars = text.len(), "completion received");
        Ok(ChatResponse { text, usage })
    }

    fn name(&self) -> &str {
        "openai-compatible"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_available(&self) -> bool {
        self.healthy.load(Ordering::Relaxed)
    }
}
