//! Embedding provider trait.

use async_trait::async_trait;

use crate::error::Result;

/// Turns text into vectors.
///
/// Chunks and questions must go through the same provider so their vectors
/// live in the same space; [`RagPipeline`](crate::RagPipeline) enforces this by
/// holding a single provider for both ingest and query.
///
/// The default [`embed_batch`](EmbeddingProvider::embed_batch) calls
/// [`embed`](EmbeddingProvider::embed) once per input. Backends with a native
/// batch endpoint override it.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed several texts, returning one vector per input in input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    /// Length of the vectors this provider produces.
    fn dimensions(&self) -> usize;
}
