//! Signed feature-hashing provider.
//!
//! Produces fixed-dimension dense vectors by hashing terms into buckets
//! with a sign bit and weighting by in-text frequency. Deterministic,
//! dependency-free, always available: the same text yields the same
//! vector on every machine.

use std::collections::HashMap;

use sieve_core::errors::SieveResult;
use sieve_core::traits::IEmbeddingProvider;

/// Deterministic hashed term-frequency embedding provider.
///
/// Not as semantically rich as a transformer, but good enough to order
/// references by lexical overlap with the protocol, and it never needs a
/// model file.
pub struct HashedProvider {
    dimensions: usize,
}

impl HashedProvider {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// FNV-1a over the term bytes. The low bit becomes the sign, the rest
    /// picks the bucket, so collisions cancel rather than pile up.
    fn hash_term(term: &str) -> u64 {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        h
    }

    /// Lowercase alphanumeric terms, two characters or longer.
    fn tokenize(text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '_')
            .filter(|s| s.len() >= 2)
            .map(|s| s.to_lowercase())
            .collect()
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        if tokens.is_empty() {
            return vec![0.0; self.dimensions];
        }

        let mut tf: HashMap<&str, f32> = HashMap::new();
        for tok in &tokens {
            *tf.entry(tok.as_str()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        let mut vec = vec![0.0f32; self.dimensions];

        for (term, count) in &tf {
            let freq = count / total;
            // Longer terms carry more signal than near-stopwords.
            let weight = 1.0 + (term.len() as f32).ln();
            let h = Self::hash_term(term);
            let bucket = ((h >> 1) as usize) % self.dimensions;
            let sign = if h & 1 == 0 { 1.0 } else { -1.0 };
            vec[bucket] += sign * freq * weight;
        }

        // L2 normalize.
        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }

        vec
    }
}

impl IEmbeddingProvider for HashedProvider {
    fn embed(&self, text: &str) -> SieveResult<Vec<f32>> {
        Ok(self.vector(text))
    }

    fn embed_batch(&self, texts: &[String]) -> SieveResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hashed"
    }

    fn is_available(&self) -> bool {
        true
    }
}
