//! LLM abstraction and Gemini client.
//!
//! The pipeline only needs one opaque capability: generate a reply from a
//! system instruction and a single user message. `LlmBackend` is that seam;
//! `GeminiClient` is the production implementation.

mod gemini;

pub use gemini::{GeminiClient, GeminiError, DEFAULT_MODEL};

use async_trait::async_trait;

/// Failure of a single generation call. Everything the pipeline treats as
/// "the model did not produce a usable reply" maps onto one of these.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("llm request failed: {0}")]
    Request(String),
    /// The service answered but with an error status or payload.
    #[error("llm api error: {0}")]
    Api(String),
    /// The call succeeded but produced no text.
    #[error("llm returned empty output")]
    EmptyOutput,
}

/// Single-call chat completion: system instruction + one user turn in, text out.
/// No retries, no streaming, no memory; each call is independent.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    async fn generate(&self, system: &str, user: &str) -> Result<String, LlmError>;
}
