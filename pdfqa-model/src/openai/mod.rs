//! OpenAI chat-completion backend.
//!
//! Works with the OpenAI API and any OpenAI-compatible server (set
//! [`OpenAIConfig::base_url`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use pdfqa_model::openai::{OpenAICompletionModel, OpenAIConfig};
//!
//! let model = OpenAICompletionModel::new(
//!     OpenAIConfig::new(std::env::var("OPENAI_KEY")?, "gpt-3.5-turbo-0301").with_temperature(0.0),
//! )?;
//! ```

mod client;
mod config;

pub use client::OpenAICompletionModel;
pub use config::{DEFAULT_MODEL, OpenAIConfig};
