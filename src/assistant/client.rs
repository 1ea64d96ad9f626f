//! HTTP client for the generative-text endpoint

use serde_json::{json, Value};
use std::time::Duration;

use crate::error::{CellHealthError, Result};

/// Environment variable holding the generative-service API key
pub const GENAI_API_KEY_ENV: &str = "GENAI_API_KEY";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Thin client posting composed prompts to the generative endpoint.
pub struct GenaiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GenaiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CellHealthError::Assistant(e.to_string()))?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Build a client from [`GENAI_API_KEY_ENV`], or `None` when unset.
    pub fn from_env() -> Option<Result<Self>> {
        std::env::var(GENAI_API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(Self::new)
    }

    /// Send `prompt` and return the generated text.
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{API_BASE}/{}:generateContent", self.model);
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CellHealthError::Assistant(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CellHealthError::Assistant(format!(
                "endpoint returned HTTP {status}"
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| CellHealthError::Assistant(e.to_string()))?;
        extract_text(&payload)
    }
}

/// Pull the generated text out of a `generateContent` response body.
fn extract_text(payload: &Value) -> Result<String> {
    let parts = payload["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| {
            CellHealthError::Assistant("response has no candidate parts".to_string())
        })?;

    let text: String = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();

    if text.is_empty() {
        return Err(CellHealthError::Assistant(
            "response candidate contains no text".to_string(),
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_from_response_shape() {
        let payload = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Keep the pack " }, { "text": "between 20% and 80%." }] }
            }]
        });
        let text = extract_text(&payload).unwrap();
        assert_eq!(text, "Keep the pack between 20% and 80%.");
    }

    #[test]
    fn test_extract_text_rejects_empty_payload() {
        assert!(extract_text(&json!({})).is_err());
        assert!(extract_text(&json!({ "candidates": [] })).is_err());
    }
}
