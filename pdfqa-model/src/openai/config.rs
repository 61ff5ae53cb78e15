//! Configuration for the OpenAI completion backend.

use crate::error::{ModelError, Result};

/// The default chat model.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo-0301";

/// Settings for [`OpenAICompletionModel`](super::OpenAICompletionModel).
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub model: String,
    /// Sampling temperature, 0.0 to 2.0.
    pub temperature: f32,
    /// Override the API base, e.g. `http://localhost:8080/v1`.
    pub base_url: Option<String>,
}

impl OpenAIConfig {
    /// Create a config for `model` with temperature 0.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), model: model.into(), temperature: 0.0, base_url: None }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(ModelError::ConfigError("API key must not be empty".into()));
        }
        if self.model.is_empty() {
            return Err(ModelError::ConfigError("model name must not be empty".into()));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ModelError::ConfigError(format!(
                "temperature must be between 0 and 2, got {}",
                self.temperature
            )));
        }
        Ok(())
    }
}
