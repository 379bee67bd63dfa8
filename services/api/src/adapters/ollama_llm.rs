//! services/api/src/adapters/ollama_llm.rs
//!
//! This module contains the adapter for a local Ollama server's `/api/chat` endpoint.
//! It implements the `GenerativeTextService` port from the `core` crate.

use crate::config::OllamaSettings;
use async_trait::async_trait;
use mindmate_core::domain::ConversationTurn;
use mindmate_core::ports::{GenerativeTextService, PortError, PortResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Newer servers answer with `message`, older generate-style ones with `response`.
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    #[serde(default)]
    message: Option<OllamaMessage>,
    #[serde(default)]
    response: Option<String>,
}

impl OllamaChatResponse {
    fn into_text(self) -> Option<String> {
        self.message
            .map(|m| m.content)
            .filter(|c| !c.trim().is_empty())
            .or(self.response)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
    }
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `GenerativeTextService` using an Ollama server.
#[derive(Clone)]
pub struct OllamaChatAdapter {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OllamaChatAdapter {
    /// Creates a new `OllamaChatAdapter` whose HTTP client gives up after `timeout`.
    pub fn new(settings: &OllamaSettings, timeout: Duration) -> PortResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
        })
    }
}

//=========================================================================================
// `GenerativeTextService` Trait Implementation
//=========================================================================================

#[async_trait]
impl GenerativeTextService for OllamaChatAdapter {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    async fn complete(&self, messages: &[ConversationTurn]) -> PortResult<String> {
        let request = OllamaChatRequest {
            model: &self.model,
            messages: messages
                .iter()
                .map(|m| OllamaMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            stream: false,
            options: OllamaOptions {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PortError::Unexpected(format!(
                "Ollama returned HTTP {}",
                response.status()
            )));
        }

        let body: OllamaChatResponse = response
            .json()
            .await
            .map_err(|e| PortError::Malformed(e.to_string()))?;

        body.into_text()
            .ok_or_else(|| PortError::Malformed("Ollama response contained no text.".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_shaped_responses_use_the_message() {
        let body: OllamaChatResponse =
            serde_json::from_str(r#"{"message":{"role":"assistant","content":" Hi there "},"done":true}"#)
                .unwrap();
        assert_eq!(body.into_text().as_deref(), Some("Hi there"));
    }

    #[test]
    fn generate_shaped_responses_use_the_response_field() {
        let body: OllamaChatResponse = serde_json::from_str(r#"{"response":"hello"}"#).unwrap();
        assert_eq!(body.into_text().as_deref(), Some("hello"));
    }

    #[test]
    fn empty_payloads_have_no_text() {
        let body: OllamaChatResponse = serde_json::from_str(r#"{"done":true}"#).unwrap();
        assert_eq!(body.into_text(), None);
    }

    #[tokio::test]
    async fn unreachable_server_is_an_error() {
        let settings = OllamaSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            model: "llama3.2".to_string(),
            temperature: 0.7,
        };
        let adapter = OllamaChatAdapter::new(&settings, Duration::from_secs(2)).unwrap();
        let result = adapter.complete(&[ConversationTurn::user("hi")]).await;
        assert!(result.is_err());
    }
}
