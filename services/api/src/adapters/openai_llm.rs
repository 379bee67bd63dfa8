//! services/api/src/adapters/openai_llm.rs
//!
//! This module contains the adapter for OpenAI chat completions.
//! It implements the `GenerativeTextService` port from the `core` crate.

use crate::config::OpenAiSettings;
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use mindmate_core::domain::{ConversationTurn, Role};
use mindmate_core::ports::{GenerativeTextService, PortError, PortResult};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `GenerativeTextService` using the OpenAI chat API.
#[derive(Clone)]
pub struct OpenAiChatAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiChatAdapter {
    /// Creates a new `OpenAiChatAdapter`.
    pub fn new(client: Client<OpenAIConfig>, settings: &OpenAiSettings) -> Self {
        Self {
            client,
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }

    /// Creates the adapter with its own client for the configured API key.
    pub fn from_settings(settings: &OpenAiSettings) -> Self {
        let config = OpenAIConfig::new().with_api_key(settings.api_key.clone());
        Self::new(Client::with_config(config), settings)
    }
}

fn to_request_message(turn: &ConversationTurn) -> PortResult<ChatCompletionRequestMessage> {
    let content = turn.content.as_str();
    let message = match turn.role {
        Role::System => ChatCompletionRequestMessage::System(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(content)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?,
        ),
        Role::User => ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessageArgs::default()
                .content(content)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?,
        ),
        Role::Assistant => ChatCompletionRequestMessage::Assistant(
            ChatCompletionRequestAssistantMessageArgs::default()
                .content(content)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?,
        ),
    };
    Ok(message)
}

//=========================================================================================
// `GenerativeTextService` Trait Implementation
//=========================================================================================

#[async_trait]
impl GenerativeTextService for OpenAiChatAdapter {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, messages: &[ConversationTurn]) -> PortResult<String> {
        let messages = messages
            .iter()
            .map(to_request_message)
            .collect::<PortResult<Vec<_>>>()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // OpenAIError is foreign, so it is flattened into a PortError here.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| {
                PortError::Malformed("OpenAI returned no choices with text content.".to_string())
            })
    }
}
