//! Prompt templates.
//!
//! A [`PromptTemplate`] is a Handlebars template with two variables: `data`,
//! the retrieved background text, and `question`. HTML escaping is disabled and
//! strict mode is on, so a template that references any other variable fails to
//! render instead of silently producing an empty slot.

use std::path::Path;

use handlebars::Handlebars;
use serde_json::json;
use tracing::debug;

use crate::error::{ModelError, Result};

/// The answer the model is told to give when the background data is not enough.
pub const NOT_ENOUGH_INFORMATION: &str =
    "I do not have enough information to answer the question.";

/// The built-in template.
pub const DEFAULT_TEMPLATE: &str = "Instruction: Answer the question below using the provided background data.

If there isn't enough information to answer, respond with:
\"I do not have enough information to answer the question.\"

Background Data:
{{data}}

Question:
{{question}}
";

const TEMPLATE_NAME: &str = "prompt";

/// Renders retrieved chunk texts and a question into a single prompt string.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    registry: Handlebars<'static>,
}

impl PromptTemplate {
    /// Compile `template`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::PromptError`] if the template does not parse.
    pub fn new(template: &str) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(true);
        registry
            .register_template_string(TEMPLATE_NAME, template)
            .map_err(|e| ModelError::PromptError(format!("invalid template: {e}")))?;
        Ok(Self { registry })
    }

    /// Compile the built-in [`DEFAULT_TEMPLATE`].
    pub fn builtin() -> Result<Self> {
        Self::new(DEFAULT_TEMPLATE)
    }

    /// Read and compile a template file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let template = std::fs::read_to_string(path).map_err(|e| {
            ModelError::PromptError(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::new(&template)
    }

    /// Render the prompt. Background texts are joined with blank lines, in the
    /// order given.
    pub fn render<S: AsRef<str>>(&self, background: &[S], question: &str) -> Result<String> {
        let data = background.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("\n\n");
        let prompt = self
            .registry
            .render(TEMPLATE_NAME, &json!({ "data": data, "question": question }))
            .map_err(|e| ModelError::PromptError(e.to_string()))?;

        debug!(background = background.len(), prompt_len = prompt.len(), "rendered prompt");
        Ok(prompt)
    }
}
