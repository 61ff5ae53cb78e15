//! Error types for the `pdfqa-rag` crate.

use thiserror::Error;

/// Errors that can occur while loading, embedding, storing or retrieving documents.
#[derive(Debug, Error)]
pub enum RagError {
    /// The document could not be fetched or parsed.
    #[error("Load error ({location}): {message}")]
    LoadError {
        /// The path or URL that was being loaded.
        location: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// Embedded chunks could not be persisted.
    #[error("Store error ({collection}): {message}")]
    StoreError {
        /// The collection being written.
        collection: String,
        /// A description of the failure.
        message: String,
    },

    /// A similarity search could not be executed.
    #[error("Query error ({collection}): {message}")]
    QueryError {
        /// The collection being searched.
        collection: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
