//! Gemini API client (Google Generative Language, `generateContent`).
//! Non-streaming only: one request per generation, no retries.

use crate::llm::{LlmBackend, LlmError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model when the config does not name one.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Client for the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error("gemini request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("gemini api error: {0}")]
    Api(String),
}

impl GeminiClient {
    /// Create a client. `base_url` and `model` fall back to the public
    /// endpoint and [`DEFAULT_MODEL`] when absent.
    pub fn new(api_key: String, model: Option<String>, base_url: Option<String>) -> Self {
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = model
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        Self {
            base_url,
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }

    /// Model id this client is bound to.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// POST /v1beta/models/{model}:generateContent — single-turn completion
    /// with a system instruction. Returns the text of the first candidate.
    pub async fn generate_content(
        &self,
        system: &str,
        user: &str,
    ) -> Result<GenerateContentResponse, GeminiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = GenerateContentRequest {
            system_instruction: Some(Content {
                role: None,
                parts: vec![Part {
                    text: system.to_string(),
                }],
            }),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: user.to_string(),
                }],
            }],
        };
        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(GeminiError::Api(format!("{} {}", status, body)));
        }
        let data: GenerateContentResponse = res.json().await?;
        Ok(data)
    }
}

#[async_trait]
impl LlmBackend for GeminiClient {
    async fn generate(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let res = self
            .generate_content(system, user)
            .await
            .map_err(|e| match e {
                GeminiError::Request(e) => LlmError::Request(e.to_string()),
                GeminiError::Api(msg) => LlmError::Api(msg),
            })?;
        let text = res.text();
        if text.trim().is_empty() {
            return Err(LlmError::EmptyOutput);
        }
        Ok(text)
    }
}

/// Gemini only accepts roles "user" and "model"; systemInstruction carries no role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, empty when absent.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}
