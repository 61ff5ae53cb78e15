//! # pdfqa-rag
//!
//! Retrieval building blocks for the pdfqa service.
//!
//! ## Overview
//!
//! Ingestion turns a PDF into searchable vectors:
//!
//! ```text
//! DocumentLoader ──► Chunker ──► EmbeddingProvider ──► VectorStore
//! ```
//!
//! Querying embeds a question with the same provider and asks the
//! [`VectorStore`] for the nearest chunks. [`RagPipeline`] wires the pieces
//! together.
//!
//! ## Backends
//!
//! | Component | Implementation | Feature |
//! |-----------|----------------|---------|
//! | Loader | [`PdfLoader`](loader::PdfLoader) | `pdf` |
//! | Chunker | [`RecursiveCharacterSplitter`] | always |
//! | Embeddings | [`OpenAIEmbeddingProvider`](openai::OpenAIEmbeddingProvider) | `openai` |
//! | Vector store | [`RedisVectorStore`](redis_store::RedisVectorStore) | `redis` |
//! | Vector store | [`InMemoryVectorStore`] | always |
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pdfqa_rag::{InMemoryVectorStore, RagConfig, RagPipeline};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .build()?;
//!
//! pipeline.ingest("docs", &document).await?;
//! let results = pipeline.query("docs", "What is the capital of France?").await?;
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inmemory;
pub mod loader;
#[cfg(feature = "openai")]
pub mod openai;
pub mod pipeline;
#[cfg(feature = "redis")]
pub mod redis_store;
pub mod vectorstore;

pub use chunking::{Chunker, RecursiveCharacterSplitter};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, SOURCE_KEY, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use inmemory::InMemoryVectorStore;
pub use loader::DocumentLoader;
#[cfg(feature = "pdf")]
pub use loader::PdfLoader;
#[cfg(feature = "openai")]
pub use openai::OpenAIEmbeddingProvider;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
#[cfg(feature = "redis")]
pub use redis_store::RedisVectorStore;
pub use vectorstore::VectorStore;
