//! Arbitration providers.

mod null;

pub use null::NullProvider;

#[cfg(feature = "remote")]
mod openai;
#[cfg(feature = "remote")]
pub use openai::OpenAiProvider;
