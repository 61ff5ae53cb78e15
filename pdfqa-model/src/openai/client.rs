//! OpenAI completion client.

use async_openai::{
    Client,
    config::OpenAIConfig as AsyncOpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use tracing::{debug, error};

use super::config::OpenAIConfig;
use crate::completion::CompletionModel;
use crate::error::{ModelError, Result};

/// Chat-completion model for the OpenAI API and OpenAI-compatible APIs.
///
/// The prompt is sent as a single user message and the first choice is
/// returned.
pub struct OpenAICompletionModel {
    client: Client<AsyncOpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAICompletionModel {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ConfigError`] for an empty key or model name, or a
    /// temperature outside 0..=2.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        config.validate()?;

        let mut openai_config = AsyncOpenAIConfig::new().with_api_key(&config.api_key);
        if let Some(base_url) = &config.base_url {
            openai_config = openai_config.with_api_base(base_url.trim_end_matches('/'));
        }

        Ok(Self {
            client: Client::with_config(openai_config),
            model: config.model,
            temperature: config.temperature,
        })
    }

    fn completion_error(&self, message: String) -> ModelError {
        error!(model = %self.model, %message, "completion failed");
        ModelError::CompletionError { model: self.model.clone(), message }
    }
}

#[async_trait]
impl CompletionModel for OpenAICompletionModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| self.completion_error(format!("failed to build message: {e}")))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(self.temperature)
            .messages(messages)
            .build()
            .map_err(|e| self.completion_error(format!("failed to build request: {e}")))?;

        debug!(model = %self.model, prompt_len = prompt.len(), "requesting completion");

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| self.completion_error(format!("OpenAI API error: {e}")))?;

        let answer = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| self.completion_error("API returned no choices".into()))?
            .message
            .content
            .unwrap_or_default();

        debug!(model = %self.model, answer_len = answer.len(), "completion received");
        Ok(answer)
    }
}
