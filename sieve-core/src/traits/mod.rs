pub mod embedding;
pub mod llm;

pub use embedding::IEmbeddingProvider;
pub use llm::{ChatRequest, ChatResponse, ILlmProvider, TokenUsage};
