//! EmbeddingEngine: provider plus cache plus warm-up gate.
//!
//! Triage warms the engine before any screening work; a provider that
//! cannot embed fails the whole batch up front instead of half way in.

use std::sync::atomic::{AtomicBool, Ordering};

use sieve_core::config::EmbeddingConfig;
use sieve_core::errors::{EmbeddingError, SieveResult};
use sieve_core::review::{Protocol, Reference};
use sieve_core::traits::IEmbeddingProvider;
use tracing::{debug, info};

use crate::cache::EmbeddingCache;
use crate::providers;
use crate::text;

const WARM_UP_PROBE: &str = "systematic review warm-up probe";

/// The embedding engine.
///
/// Implements `IEmbeddingProvider` itself, so anything expecting a bare
/// provider can take the cached engine instead.
pub struct EmbeddingEngine {
    provider: Box<dyn IEmbeddingProvider>,
    cache: EmbeddingCache,
    config: EmbeddingConfig,
    warmed: AtomicBool,
}

impl EmbeddingEngine {
    /// Build the configured provider and wrap it with the L1 cache.
    pub fn new(config: EmbeddingConfig) -> SieveResult<Self> {
        let provider = providers::create_provider(&config)?;
        info!(
            provider = provider.name(),
            dims = config.dimensions,
            "embedding engine initialized"
        );
        Ok(Self {
            cache: EmbeddingCache::new(config.cache_capacity, config.cache_ttl_secs),
            provider,
            config,
            warmed: AtomicBool::new(false),
        })
    }

    /// Wrap a caller-supplied provider (tests, custom models).
    pub fn with_provider(provider: Box<dyn IEmbeddingProvider>, config: EmbeddingConfig) -> Self {
        Self {
            cache: EmbeddingCache::new(config.cache_capacity, config.cache_ttl_secs),
            provider,
            config,
            warmed: AtomicBool::new(false),
        }
    }

    /// Eagerly verify the provider can embed. Idempotent.
    ///
    /// # Errors
    /// `EmbeddingError::ModelUnavailable` when the provider reports itself
    /// down or the probe fails; `DimensionMismatch` when the probe vector
    /// has the wrong width.
    pub fn warm_up(&self) -> SieveResult<()> {
        if self.warmed.load(Ordering::Acquire) {
            return Ok(());
        }
        if !self.provider.is_available() {
            return Err(EmbeddingError::ModelUnavailable {
                provider: self.provider.name().to_string(),
                reason: "provider reports unavailable".to_string(),
            }
            .into());
        }
        let probe = self.provider.embed(WARM_UP_PROBE).map_err(|e| {
            EmbeddingError::ModelUnavailable {
                provider: self.provider.name().to_string(),
                reason: e.to_string(),
            }
        })?;
        if probe.len() != self.config.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.config.dimensions,
                actual: probe.len(),
            }
            .into());
        }
        self.warmed.store(true, Ordering::Release);
        info!(provider = self.provider.name(), "embedding provider warm");
        Ok(())
    }

    pub fn is_warm(&self) -> bool {
        self.warmed.load(Ordering::Acquire)
    }

    /// Embed one text through the cache.
    pub fn embed_text(&self, text: &str) -> SieveResult<Vec<f32>> {
        let key = EmbeddingCache::key(self.provider.name(), self.config.dimensions, text);
        if let Some(hit) = self.cache.get(&key) {
            debug!(key = %key, "embedding cache hit");
            return Ok(hit);
        }
        let vector = self.provider.embed(text)?;
        self.cache.insert(key, vector.clone());
        Ok(vector)
    }

    /// Embed the protocol query text (PICO plus inclusion criteria).
    pub fn embed_query(&self, protocol: &Protocol) -> SieveResult<Vec<f32>> {
        self.embed_text(&text::query_text(protocol))
    }

    /// Embed one reference (title plus abstract).
    pub fn embed_reference(&self, reference: &Reference) -> SieveResult<Vec<f32>> {
        self.embed_text(&text::reference_text(reference))
    }

    /// Embed a slice of references (title plus abstract each).
    pub fn embed_references(&self, references: &[Reference]) -> SieveResult<Vec<Vec<f32>>> {
        references
            .iter()
            .map(|r| self.embed_reference(r))
            .collect()
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }
}

impl IEmbeddingProvider for EmbeddingEngine {
    fn embed(&self, text: &str) -> SieveResult<Vec<f32>> {
        self.embed_text(text)
    }

    fn embed_batch(&self, texts: &[String]) -> SieveResult<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed_text(t)).collect()
    }

    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    fn name(&self) -> &str {
        "sieve-embedding-engine"
    }

    fn is_available(&self) -> bool {
        self.provider.is_available()
    }
}
