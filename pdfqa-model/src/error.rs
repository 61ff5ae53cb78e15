//! Error types for completion models and prompts.

use thiserror::Error;

/// Errors raised while building prompts or generating completions.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The completion API failed or returned no usable answer.
    #[error("Completion error ({model}): {message}")]
    CompletionError { model: String, message: String },

    /// The prompt template is malformed or a variable is missing.
    #[error("Prompt error: {0}")]
    PromptError(String),

    /// Invalid model configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A convenience result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
