//! Persona-bound responder: one user message in, one assistant reply out.
//!
//! `reply` is a total function: every backend failure is logged and replaced
//! with a fixed fallback string, so callers never see an error and never see
//! an empty reply.

use crate::llm::LlmBackend;
use crate::persona::Persona;

/// Fallback reply when generation fails for any reason.
pub const GENERATION_FALLBACK: &str =
    "Sorry, I could not generate a response right now. Please try again.";

/// Single-turn responder bound to a persona and an injected LLM backend.
/// The backend is generic so tests can substitute a double.
pub struct Responder<B: LlmBackend> {
    backend: B,
    persona: Persona,
}

impl<B: LlmBackend> Responder<B> {
    pub fn new(backend: B, persona: Persona) -> Self {
        Self { backend, persona }
    }

    /// Generate a reply to `user_message`. Empty input is valid here; the
    /// handler filters it before delegating. Always returns non-empty text.
    pub async fn reply(&self, user_message: &str) -> String {
        match self
            .backend
            .generate(self.persona.instruction(), user_message)
            .await
        {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                log::error!("responder: generation error: backend returned empty text");
                GENERATION_FALLBACK.to_string()
            }
            Err(e) => {
                log::error!("responder: generation error: {}", e);
                GENERATION_FALLBACK.to_string()
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }
}
