//! Shared test scaffolding: deterministic providers and ready-made
//! screening scenarios used by integration tests across crates.

pub mod providers;
pub mod scenarios;

pub use providers::{ScriptedLlm, VectorProvider};
pub use scenarios::{
    mfa_protocol, mfa_references, mfa_vector_provider, verdict_reply, EMBEDDING_DIMENSIONS,
};
