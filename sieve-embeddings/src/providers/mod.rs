//! Provider construction.
//!
//! Selection is a closed enum match: `Hashed` always constructs, `Onnx`
//! requires the `onnx` feature and a model path. There is no silent
//! fallback chain: an unusable provider is a hard `ModelUnavailable`,
//! because screening must never start against a model that cannot embed.

mod hashed;
#[cfg(feature = "onnx")]
mod onnx_provider;

pub use hashed::HashedProvider;
#[cfg(feature = "onnx")]
pub use onnx_provider::OnnxProvider;

use sieve_core::config::{EmbeddingConfig, EmbeddingProviderKind};
use sieve_core::errors::{EmbeddingError, SieveResult};
use sieve_core::traits::IEmbeddingProvider;
use tracing::info;

/// Construct the configured provider.
pub fn create_provider(config: &EmbeddingConfig) -> SieveResult<Box<dyn IEmbeddingProvider>> {
    match config.kind {
        EmbeddingProviderKind::Hashed => {
            info!(provider = "hashed", dims = config.dimensions, "embedding provider ready");
            Ok(Box::new(HashedProvider::new(config.dimensions)))
        }
        EmbeddingProviderKind::Onnx => create_onnx(config),
    }
}

#[cfg(feature = "onnx")]
fn create_onnx(config: &EmbeddingConfig) -> SieveResult<Box<dyn IEmbeddingProvider>> {
    let path = config
        .model_path
        .as_deref()
        .ok_or_else(|| EmbeddingError::ModelUnavailable {
            provider: "onnx".to_string(),
            reason: "model_path not set".to_string(),
        })?;
    let provider = OnnxProvider::load(path, config.dimensions)?;
    info!(provider = "onnx", path, dims = config.dimensions, "embedding provider ready");
    Ok(Box::new(provider))
}

#[cfg(not(feature = "onnx"))]
fn create_onnx(_config: &EmbeddingConfig) -> SieveResult<Box<dyn IEmbeddingProvider>> {
    Err(EmbeddingError::ModelUnavailable {
        provider: "onnx".to_string(),
        reason: "built without the onnx feature".to_string(),
    }
    .into())
}
