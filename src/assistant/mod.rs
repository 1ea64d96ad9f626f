//! Battery-health chat assistant collaborator
//!
//! Gated, non-fatal by design: an off-topic question gets a fixed refusal,
//! a missing API key gets a fixed apology, and backend failures surface as
//! strings. Nothing here can abort a pipeline run.

pub mod client;
pub mod gate;

pub use client::{GenaiClient, GENAI_API_KEY_ENV};
pub use gate::{KeywordGate, TopicGate};

/// Returned for questions outside the battery domain
pub const REFUSAL_MESSAGE: &str =
    "I can only answer battery-related questions. Please ask about batteries, \
     battery health, charging, safety, maintenance, or SOH.";

/// Returned when no API key is configured
pub const MISSING_KEY_MESSAGE: &str =
    "API key not found. Set GENAI_API_KEY to enable the assistant.";

/// Compose the full prompt: report context plus the user's question.
pub fn compose_prompt(question: &str, predicted_soh: Option<f64>) -> String {
    let context = match predicted_soh {
        Some(soh) => format!("The predicted battery SOH is {:.2}%. ", soh * 100.0),
        None => String::new(),
    };
    format!(
        "{context}You are a professional battery health assistant for a research project. \
         You must ONLY answer questions related to batteries, battery health, charging, \
         safety, maintenance, and SOH. If the user's question is NOT related to batteries, \
         politely say you cannot answer it and redirect them to battery questions. \
         Be polite, respectful, and professional.\n\nUser question: {question}"
    )
}

/// The assistant: a topic gate in front of a generative backend.
pub struct Assistant {
    gate: Box<dyn TopicGate + Send + Sync>,
    client: Option<GenaiClient>,
}

impl Assistant {
    pub fn new(gate: impl TopicGate + Send + Sync + 'static, client: Option<GenaiClient>) -> Self {
        Self {
            gate: Box::new(gate),
            client,
        }
    }

    /// Keyword-gated assistant with credentials from the environment.
    /// With no usable key the assistant still answers, with the fixed
    /// apology string.
    pub fn from_env() -> Self {
        let client = GenaiClient::from_env().and_then(|c| c.ok());
        Self::new(KeywordGate::battery_domain(), client)
    }

    /// Answer one question. Always returns a displayable string.
    pub async fn respond(&self, question: &str, predicted_soh: Option<f64>) -> String {
        if !self.gate.is_on_topic(question) {
            return REFUSAL_MESSAGE.to_string();
        }
        let Some(client) = &self.client else {
            return MISSING_KEY_MESSAGE.to_string();
        };
        match client.generate(&compose_prompt(question, predicted_soh)).await {
            Ok(text) => text,
            Err(e) => e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_soh_context() {
        let prompt = compose_prompt("How healthy is my pack?", Some(0.82));
        assert!(prompt.starts_with("The predicted battery SOH is 82.00%."));
        assert!(prompt.contains("User question: How healthy is my pack?"));
    }

    #[test]
    fn test_prompt_without_context() {
        let prompt = compose_prompt("Is trickle charging safe?", None);
        assert!(prompt.starts_with("You are a professional battery health assistant"));
    }

    #[tokio::test]
    async fn test_off_topic_refused_without_backend_call() {
        let assistant = Assistant::new(KeywordGate::battery_domain(), None);
        let reply = assistant.respond("Recommend a pizza place", None).await;
        assert_eq!(reply, REFUSAL_MESSAGE);
    }

    #[tokio::test]
    async fn test_missing_key_yields_fixed_message() {
        let assistant = Assistant::new(KeywordGate::battery_domain(), None);
        let reply = assistant.respond("Why is my battery degrading?", None).await;
        assert_eq!(reply, MISSING_KEY_MESSAGE);
    }
}
