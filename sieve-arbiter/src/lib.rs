//! # sieve-arbiter
//!
//! LLM arbitration for gray-zone references: prompt templates, verdict
//! parsing with one strict re-ask, retry with exponential backoff, and
//! usage accounting. The engine is generic over [`ILlmProvider`]
//! implementations; the `remote` feature adds an OpenAI-compatible HTTP
//! provider.
//!
//! [`ILlmProvider`]: sieve_core::traits::ILlmProvider

pub mod engine;
pub mod prompts;
pub mod providers;
pub mod retry;
pub mod verdict;

pub use engine::ArbiterEngine;
pub use providers::NullProvider;
#[cfg(feature = "remote")]
pub use providers::OpenAiProvider;
pub use retry::{retry_with_backoff, BackoffPolicy};
pub use verdict::{parse_verdict, Verdict};
