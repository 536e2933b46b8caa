//! Typed errors for every subsystem, unified under [`SieveError`].

mod arbiter_error;
mod embedding_error;
mod ledger_error;
mod screening_error;
mod validation_error;

pub use arbiter_error::ArbiterError;
pub use embedding_error::EmbeddingError;
pub use ledger_error::LedgerError;
pub use screening_error::ScreeningError;
pub use validation_error::ValidationError;

/// Workspace-wide result alias.
pub type SieveResult<T> = Result<T, SieveError>;

/// Top-level error: every subsystem error converts into this.
#[derive(Debug, thiserror::Error)]
pub enum SieveError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Arbiter(#[from] ArbiterError),

    #[error(transparent)]
    Screening(#[from] ScreeningError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("config parse failed: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
