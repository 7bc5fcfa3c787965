//! Gemini API client.
//!
//! Wraps a single `generateContent` call: prompt in, free-form text out.
//! No retry and no streaming; failures surface as [`AdvisoryError`].

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AdvisoryConfig;

#[derive(Error, Debug)]
pub enum AdvisoryError {
    #[error("Advisory request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Advisory service returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("Advisory response contained no text")]
    EmptyResponse,
}

/// A source of generated advisory text.
#[async_trait]
pub trait AdvisoryProvider: Send + Sync {
    /// Generate advisory text for a prompt.
    async fn generate(&self, prompt: &str) -> Result<String, AdvisoryError>;
}

/// Client for the Gemini `generateContent` REST API.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

// ─── Wire Types ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Deserialize)]
struct TextPart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    pub fn new(config: &AdvisoryConfig, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        }
    }
}

#[async_trait]
impl AdvisoryProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, AdvisoryError> {
        // The key travels in the query string, per the Gemini REST contract.
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(AdvisoryError::Status(response.status()));
        }

        let reply: GenerateContentResponse = response.json().await?;
        reply
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|t| !t.is_empty())
            .ok_or(AdvisoryError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = AdvisoryConfig {
            base_url: "https://example.test/".to_string(),
            ..AdvisoryConfig::default()
        };
        let client = GeminiClient::new(&config, "k".to_string());
        assert_eq!(client.base_url, "https://example.test");
    }

    #[test]
    fn test_request_wire_shape() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hello" }],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn test_response_wire_shape() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Use Urea."}], "role": "model"}}
            ]
        }"#;
        let reply: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(reply.candidates[0].content.parts[0].text, "Use Urea.");
    }

    #[test]
    fn test_response_without_candidates() {
        let reply: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(reply.candidates.is_empty());
    }
}
