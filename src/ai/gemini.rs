//! Gemini REST client for text generation.
//!
//! A thin blocking wrapper over the `generateContent` endpoint. Every
//! transport, status, or decode failure is logged and collapsed into the one
//! user-facing [`Error::AiUnavailable`] message the modal shows.

use crate::ai::TextGenerator;
use crate::error::{Error, Result};
use crate::logging;
use serde::Deserialize;
use std::time::Duration;

/// Model used when the config does not name one.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default API endpoint.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Per-request timeout. Generation is slow but not minutes-slow.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Base URL (defaults to the hosted endpoint; overridable for tests).
    pub base_url: String,
    /// The model to use.
    pub model: String,
}

impl GeminiConfig {
    /// Create a new config with the given API key and the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
        }
    }

    /// Set a custom base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Blocking Gemini API client.
#[derive(Debug)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    /// Create a client from a config.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn extract_text(response: &GenerateResponse) -> Option<String> {
        let parts = &response.candidates.first()?.content.as_ref()?.parts;
        let text: String =
            parts.iter().filter_map(|p| p.text.as_deref()).collect::<Vec<_>>().join("");
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                logging::log(&format!("Gemini API error: {e}"));
                Error::AiUnavailable
            })?;

        if !response.status().is_success() {
            logging::log(&format!("Gemini API error: status {}", response.status()));
            return Err(Error::AiUnavailable);
        }

        let parsed: GenerateResponse = response.json().map_err(|e| {
            logging::log(&format!("Gemini API error: bad response body: {e}"));
            Error::AiUnavailable
        })?;

        Self::extract_text(&parsed).ok_or_else(|| {
            logging::log("Gemini API error: response carried no text");
            Error::AiUnavailable
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_endpoint_includes_model() {
        let client =
            GeminiClient::new(GeminiConfig::new("key").with_base_url("http://localhost:9000/"))
                .unwrap();
        assert_eq!(
            client.endpoint(),
            format!("http://localhost:9000/v1beta/models/{DEFAULT_MODEL}:generateContent")
        );
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"Plano: "},{"text":"1. começar"}]}}]}"#,
        );
        assert_eq!(GeminiClient::extract_text(&response).unwrap(), "Plano: 1. começar");
    }

    #[test]
    fn test_extract_text_handles_empty_responses() {
        assert_eq!(GeminiClient::extract_text(&parse(r#"{"candidates":[]}"#)), None);
        assert_eq!(GeminiClient::extract_text(&parse(r"{}")), None);
        let no_text = parse(r#"{"candidates":[{"content":{"parts":[]}}]}"#);
        assert_eq!(GeminiClient::extract_text(&no_text), None);
    }

    #[test]
    fn test_config_builders() {
        let config = GeminiConfig::new("k").with_model("gemini-x").with_base_url("http://x");
        assert_eq!(config.model, "gemini-x");
        assert_eq!(config.base_url, "http://x");
    }
}
