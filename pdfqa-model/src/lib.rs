//! # pdfqa-model
//!
//! Completion models and prompt templates for the pdfqa service.
//!
//! ## Overview
//!
//! - [`CompletionModel`] - a model that turns one prompt into one answer
//! - [`OpenAICompletionModel`] - OpenAI chat completions (feature `openai`, on by default)
//! - [`PromptTemplate`] - renders retrieved background data and a question into a prompt
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pdfqa_model::{CompletionModel, OpenAICompletionModel, OpenAIConfig, PromptTemplate};
//!
//! let model = OpenAICompletionModel::new(OpenAIConfig::new(api_key, "gpt-3.5-turbo-0301"))?;
//! let prompt = PromptTemplate::builtin()?.render(&["The capital of France is Paris."], "Capital of France?")?;
//! let answer = model.complete(&prompt).await?;
//! ```

pub mod completion;
pub mod error;
#[cfg(feature = "openai")]
pub mod openai;
pub mod prompt;

pub use completion::CompletionModel;
pub use error::{ModelError, Result};
#[cfg(feature = "openai")]
pub use openai::{OpenAICompletionModel, OpenAIConfig};
pub use prompt::{DEFAULT_TEMPLATE, NOT_ENOUGH_INFORMATION, PromptTemplate};
