//! Deterministic providers: embeddings from a needle table and a scripted
//! chat provider that records its requests.

use std::sync::{Arc, Mutex};

use sieve_core::errors::ArbiterError;
use sieve_core::traits::{ChatRequest, ChatResponse, IEmbeddingProvider, ILlmProvider};
use sieve_core::SieveResult;

/// Embedding provider backed by a needle table.
///
/// `embed` returns the vector registered for the first needle contained
/// in the input text, or a zero vector of the right width when nothing
/// matches, so warm-up probes and unknown texts stay well-formed.
pub struct VectorProvider {
    dimensions: usize,
    table: Vec<(String, Vec<f32>)>,
}

impl VectorProvider {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            table: Vec::new(),
        }
    }

    /// Register a needle and the vector to return for texts containing it.
    ///
    /// # Panics
    /// Panics when the vector width does not match the provider.
    pub fn insert(&mut self, needle: impl Into<String>, vector: Vec<f32>) {
        assert_eq!(vector.len(), self.dimensions, "fixture vector width");
        self.table.push((needle.into(), vector));
    }

    /// A unit vector whose cosine to the first axis is `cosine`.
    pub fn unit_at_cosine(dimensions: usize, cosine: f64) -> Vec<f32> {
        let mut vector = vec![0.0f32; dimensions];
        vector[0] = cosine as f32;
        vector[1] = (1.0 - cosine * cosine).max(0.0).sqrt() as f32;
        vector
    }
}

impl IEmbeddingProvider for VectorProvider {
    fn embed(&self, text: &str) -> SieveResult<Vec<f32>> {
        for (needle, vector) in &self.table {
            if text.contains(needle.as_str()) {
                return Ok(vector.clone());
            }
        }
        Ok(vec![0.0; self.dimensions])
    }

    fn embed_batch(&self, texts: &[String]) -> SieveResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "fixture-vectors"
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Chat provider that replays a prepared script and records every request.
///
/// Replies are consumed front to back; an exhausted script answers with a
/// non-retryable `ProviderUnavailable` so an over-calling test fails
/// loudly instead of hanging.
pub struct ScriptedLlm {
    model: String,
    script: Mutex<Vec<Result<ChatResponse, ArbiterError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedLlm {
    pub fn new(script: Vec<Result<ChatResponse, ArbiterError>>) -> Arc<Self> {
        Arc::new(Self {
            model: "fixture-model".to_string(),
            script: Mutex::new(script),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Completions served so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }

    /// The nth request received, if any.
    pub fn request(&self, index: usize) -> Option<ChatRequest> {
        self.requests
            .lock()
            .expect("requests lock")
            .get(index)
            .cloned()
    }
}

impl ILlmProvider for ScriptedLlm {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ArbiterError> {
        self.requests.lock().expect("requests lock").push(request);
        let mut script = self.script.lock().expect("script lock");
        if script.is_empty() {
            return Err(ArbiterError::ProviderUnavailable {
                provider: "scripted".to_string(),
                reason: "script exhausted".to_string(),
            });
        }
        script.remove(0)
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_at_cosine_has_unit_norm() {
        for cosine in [0.0, 0.25, 0.85, 1.0] {
            let v = VectorProvider::unit_at_cosine(4, cosine);
            let norm: f64 = v.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-6, "cosine {cosine}: norm {norm}");
        }
    }

    #[test]
    fn unknown_text_embeds_to_a_zero_vector() {
        let provider = VectorProvider::new(4);
        let v = provider.embed("nothing registered").unwrap();
        assert_eq!(v.len(), 4);
        assert!(v.iter().all(|x| *x == 0.0));
    }
}
