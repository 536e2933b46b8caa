//! # sieve-embeddings
//!
//! Embedding layer for reference screening: provider selection behind a
//! closed enum, an eager warm-up gate, a moka L1 cache keyed by blake3
//! content hashes, and the query/reference text assembly rules.
//!
//! The default `hashed` provider is deterministic and dependency-free;
//! the `onnx` feature adds local transformer inference via `ort`.

pub mod cache;
pub mod engine;
pub mod providers;
pub mod text;

pub use cache::EmbeddingCache;
pub use engine::EmbeddingEngine;
pub use providers::HashedProvider;
