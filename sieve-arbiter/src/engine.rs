//! Arbitration engine: prompt assembly, provider calls with retry, verdict
//! parsing with one strict re-ask, and usage accounting.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use sieve_core::config::ArbiterConfig;
use sieve_core::errors::ArbiterError;
use sieve_core::models::UsageEvent;
use sieve_core::traits::{ChatResponse, ILlmProvider};
use sieve_core::{
    Confidence, Decision, DecisionLabel, DecisionSource, Protocol, Reference, Stage,
};
use tracing::{debug, warn};

use crate::prompts::{self, PromptTemplate, SCREENING, SCREENING_STRICT};
use crate::retry::{retry_with_backoff, BackoffPolicy};
use crate::verdict::{parse_verdict, Verdict};

/// Endpoint label recorded in usage events.
const CHAT_ENDPOINT: &str = "chat/completions";

/// Decides gray-zone references by asking an LLM provider.
///
/// Generic over the provider so deployments choose their transport at
/// compile time; the triage layer shares one engine across its worker
/// tasks behind an `Arc`.
pub struct ArbiterEngine<P> {
    provider: Arc<P>,
    config: ArbiterConfig,
    usage: Mutex<Vec<UsageEvent>>,
}

impl<P: ILlmProvider> ArbiterEngine<P> {
    pub fn new(provider: Arc<P>, config: ArbiterConfig) -> Self {
        Self {
            provider,
            config,
            usage: Mutex::new(Vec::new()),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_available()
    }

    /// Decide one reference.
    ///
    /// References without an abstract never reach the model: there is
    /// nothing to judge, so they come back `maybe` immediately. Transport
    /// failures that outlive the retry budget surface as errors; replies
    /// that stay unparseable after one strict re-ask degrade to a `maybe`
    /// flagged `parse_failure`.
    pub async fn arbitrate(
        &self,
        protocol: &Protocol,
        reference: &Reference,
    ) -> Result<Decision, ArbiterError> {
        if !reference.has_abstract() {
            debug!(reference_id = %reference.id, "empty abstract, skipping arbitration");
            return Ok(low_confidence_maybe(&reference.id, "empty abstract"));
        }

        let reply = self.ask(&SCREENING, protocol, reference).await?;
        let verdict = match parse_verdict(&reply.text) {
            Ok(v) => v,
            Err(first) => {
                warn!(
                    reference_id = %reference.id,
                    error = %first,
                    "unparseable verdict, re-asking strictly"
                );
                let strict = self.ask(&SCREENING_STRICT, protocol, reference).await?;
                match parse_verdict(&strict.text) {
                    Ok(v) => v,
                    Err(second) => {
                        warn!(
                            reference_id = %reference.id,
                            error = %second,
                            "strict re-ask still unparseable"
                        );
                        return Ok(low_confidence_maybe(
                            &reference.id,
                            format!("parse_failure: {second}"),
                        ));
                    }
                }
            }
        };

        debug!(
            reference_id = %reference.id,
            label = %verdict.label,
            score = verdict.score,
            "arbitration verdict"
        );
        Ok(decision_from_verdict(&reference.id, &verdict))
    }

    /// One prompt round-trip: render, call with retry, account every
    /// attempt.
    async fn ask(
        &self,
        template: &PromptTemplate,
        protocol: &Protocol,
        reference: &Reference,
    ) -> Result<ChatResponse, ArbiterError> {
        let request = prompts::build_request(template, protocol, reference, &self.config);
        let policy = BackoffPolicy::from_config(&self.config);
        retry_with_backoff(policy, template.name, |_| {
            let request = request.clone();
            async move {
                let result = self.provider.complete(request).await;
                self.record(&result);
                result
            }
        })
        .await
    }

    /// Append a usage event. Recording never fails and never blocks
    /// arbitration, even across a poisoned lock.
    fn record(&self, result: &Result<ChatResponse, ArbiterError>) {
        let tokens = result
            .as_ref()
            .ok()
            .and_then(|r| r.usage)
            .unwrap_or_default();
        let event = UsageEvent {
            provider: self.provider.name().to_string(),
            model: self.provider.model().to_string(),
            endpoint: CHAT_ENDPOINT.to_string(),
            prompt_tokens: tokens.prompt_tokens,
            completion_tokens: tokens.completion_tokens,
            total_tokens: tokens.total_tokens,
            success: result.is_ok(),
            error: result.as_ref().err().map(|e| e.to_string()),
            at: Utc::now(),
        };
        match self.usage.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }

    /// Hand accumulated usage events to the caller and reset the buffer.
    pub fn drain_usage_events(&self) -> Vec<UsageEvent> {
        match self.usage.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

fn low_confidence_maybe(reference_id: &str, rationale: impl Into<String>) -> Decision {
    Decision::automated(
        reference_id,
        Stage::TitleAbstract,
        DecisionSource::Llm,
        DecisionLabel::Maybe,
        Confidence::new(Confidence::LOW),
        rationale,
    )
}

fn decision_from_verdict(reference_id: &str, verdict: &Verdict) -> Decision {
    let rationale = if verdict.reasoning.trim().is_empty() {
        format!("model verdict: {}", verdict.label)
    } else {
        verdict.reasoning.clone()
    };
    Decision::automated(
        reference_id,
        Stage::TitleAbstract,
        DecisionSource::Llm,
        verdict.label,
        verdict.confidence(),
        rationale,
    )
}
