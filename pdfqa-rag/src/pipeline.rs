//! RAG pipeline orchestrator.
//!
//! The [`RagPipeline`] coordinates ingestion and retrieval by composing an
//! [`EmbeddingProvider`], a [`VectorStore`] and a [`Chunker`].
//!
//! # Example
//!
//! ```rust,ignore
//! use pdfqa_rag::{RagPipeline, RagConfig, InMemoryVectorStore};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .build()?;
//!
//! pipeline.ingest("docs", &document).await?;
//! let results = pipeline.query("docs", "search query").await?;
//! ```

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::chunking::{Chunker, RecursiveCharacterSplitter};
use crate::config::RagConfig;
use crate::document::{Chunk, Document, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// The RAG pipeline orchestrator.
///
/// Ingestion runs chunk → embed → store; queries run embed → search →
/// threshold filter. Construct one via [`RagPipeline::builder()`].
pub struct RagPipeline {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    chunker: Arc<dyn Chunker>,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Ingest a single document: chunk → embed → store.
    ///
    /// Returns the chunks that were stored (with embeddings attached).
    ///
    /// # Errors
    ///
    /// - [`RagError::EmbeddingError`] if the provider fails.
    /// - [`RagError::StoreError`] if the vector store rejects the write.
    pub async fn ingest(&self, collection: &str, document: &Document) -> Result<Vec<Chunk>> {
        let mut chunks = self.chunker.chunk(document);
        if chunks.is_empty() {
            info!(document.id = %document.id, chunk_count = 0, "ingested document (empty)");
            return Ok(chunks);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.inspect_err(|e| {
            error!(document.id = %document.id, error = %e, "embedding failed during ingestion");
        })?;

        if embeddings.len() != chunks.len() {
            return Err(RagError::EmbeddingError {
                provider: "pipeline".to_string(),
                message: format!(
                    "expected {} embeddings for document '{}', got {}",
                    chunks.len(),
                    document.id,
                    embeddings.len()
                ),
            });
        }

        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        self.vector_store.upsert(collection, &chunks).await.map_err(|e| {
            error!(document.id = %document.id, error = %e, "upsert failed during ingestion");
            RagError::StoreError {
                collection: collection.to_string(),
                message: format!("upsert failed for document '{}': {e}", document.id),
            }
        })?;

        let chunk_count = chunks.len();
        info!(document.id = %document.id, collection, chunk_count, "ingested document");

        Ok(chunks)
    }

    /// Ingest multiple documents through the chunk → embed → store workflow.
    ///
    /// Returns all chunks that were stored across all documents. Stops at the
    /// first failing document; chunks already written stay in the store.
    pub async fn ingest_batch(
        &self,
        collection: &str,
        documents: &[Document],
    ) -> Result<Vec<Chunk>> {
        let mut all_chunks = Vec::new();
        for document in documents {
            let chunks = self.ingest(collection, document).await?;
            all_chunks.extend(chunks);
        }
        Ok(all_chunks)
    }

    /// Retrieve the chunks most similar to `query`.
    ///
    /// Returns at most `top_k` results ordered by descending similarity.
    /// Results below the configured `similarity_threshold`, if any, are dropped.
    ///
    /// # Errors
    ///
    /// - [`RagError::EmbeddingError`] if the question cannot be embedded.
    /// - [`RagError::QueryError`] if the store is unreachable or the collection is missing.
    pub async fn query(&self, collection: &str, query: &str) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedding_provider.embed(query).await.inspect_err(|e| {
            error!(error = %e, "embedding failed during query");
        })?;

        let mut results = self
            .vector_store
            .search(collection, &query_embedding, self.config.top_k)
            .await
            .map_err(|e| {
                error!(collection, error = %e, "vector store search failed");
                RagError::QueryError {
                    collection: collection.to_string(),
                    message: format!("search failed: {e}"),
                }
            })?;

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(self.config.top_k);
        if let Some(threshold) = self.config.similarity_threshold {
            results.retain(|r| r.score >= threshold);
        }

        debug!(
            collection,
            scores = ?results.iter().map(|r| r.score).collect::<Vec<_>>(),
            "retrieved chunks"
        );
        info!(collection, result_count = results.len(), "query completed");

        Ok(results)
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// `config` defaults to [`RagConfig::default()`] and `chunker` to a
/// [`RecursiveCharacterSplitter`] sized by that config. The embedding
/// provider and vector store are required.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider used for both chunks and queries.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Replace the default splitter. The config's chunk sizes are then ignored.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`RagPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any required field is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;
        let config = self.config.unwrap_or_default();
        let chunker = self.chunker.unwrap_or_else(|| {
            Arc::new(RecursiveCharacterSplitter::new(config.chunk_size, config.chunk_overlap))
        });

        Ok(RagPipeline { config, embedding_provider, vector_store, chunker })
    }
}
