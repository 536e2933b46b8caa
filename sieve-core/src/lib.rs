//! # sieve-core
//!
//! Foundation crate for the sieve evidence-classification engine.
//! Defines the shared types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod checklist;
pub mod config;
pub mod constants;
pub mod errors;
pub mod mode;
pub mod models;
pub mod review;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::SieveConfig;
pub use errors::{SieveError, SieveResult};
pub use mode::ClassificationMode;
pub use review::{
    Confidence, Decision, DecisionLabel, DecisionSource, Protocol, Reference, Stage, TemporalRange,
};
