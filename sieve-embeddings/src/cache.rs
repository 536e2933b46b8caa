//! L1 in-memory embedding cache using moka.
//!
//! TinyLFU admission policy, TTL from config. Keys are blake3 hashes over
//! provider name, dimensionality, and text, so switching providers or
//! dimensions never serves stale vectors.

use std::time::Duration;

use moka::sync::Cache;

/// L1 in-memory embedding cache.
pub struct EmbeddingCache {
    cache: Cache<String, Vec<f32>>,
}

impl EmbeddingCache {
    /// Create a cache with the given max entry count and TTL.
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();
        Self { cache }
    }

    /// Cache key for a text under a provider/dimension pair.
    pub fn key(provider: &str, dimensions: usize, text: &str) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(provider.as_bytes());
        hasher.update(&dimensions.to_le_bytes());
        hasher.update(text.as_bytes());
        hasher.finalize().to_hex().to_string()
    }

    pub fn get(&self, key: &str) -> Option<Vec<f32>> {
        self.cache.get(key)
    }

    pub fn insert(&self, key: String, embedding: Vec<f32>) {
        self.cache.insert(key, embedding);
    }

    /// Number of entries currently in the cache.
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invalidate all entries.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get() {
        let cache = EmbeddingCache::new(100, 60);
        let key = EmbeddingCache::key("hashed", 4, "some text");
        cache.insert(key.clone(), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(cache.get(&key), Some(vec![1.0, 2.0, 3.0, 4.0]));
    }

    #[test]
    fn miss_returns_none() {
        let cache = EmbeddingCache::new(100, 60);
        assert_eq!(cache.get("nonexistent"), None);
    }

    #[test]
    fn key_depends_on_provider_and_dimensions() {
        let a = EmbeddingCache::key("hashed", 384, "text");
        let b = EmbeddingCache::key("onnx", 384, "text");
        let c = EmbeddingCache::key("hashed", 128, "text");
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn clear_empties_cache() {
        let cache = EmbeddingCache::new(100, 60);
        cache.insert("a".to_string(), vec![1.0]);
        cache.insert("b".to_string(), vec![2.0]);
        cache.clear();
        // moka may not immediately reflect invalidation in entry_count,
        // but get must return None.
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), None);
    }
}
