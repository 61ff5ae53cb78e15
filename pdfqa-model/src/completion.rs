//! The completion model trait.

use async_trait::async_trait;

use crate::error::Result;

/// A language model that answers a fully rendered prompt.
///
/// Implementations must be `Send + Sync` so one instance can be shared by all
/// request handlers.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// The model name, used in logs and error messages.
    fn name(&self) -> &str;

    /// Generate the answer text for `prompt`.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
