//! Document loaders.
//!
//! [`DocumentLoader`] is the seam between the service and wherever documents
//! come from. [`PdfLoader`] (feature `pdf`) reads a PDF from a local path or an
//! HTTP(S) URL and merges all pages into a single [`Document`].

use async_trait::async_trait;

use crate::document::Document;
use crate::error::Result;

/// Loads documents from a location such as a file path or URL.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Load every document found at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::LoadError`](crate::RagError::LoadError) if the
    /// resource cannot be fetched or parsed.
    async fn load(&self, location: &str) -> Result<Vec<Document>>;
}

#[cfg(feature = "pdf")]
pub use pdf::PdfLoader;

#[cfg(feature = "pdf")]
mod pdf {
    use async_trait::async_trait;
    use tracing::{debug, error, info};
    use uuid::Uuid;

    use super::DocumentLoader;
    use crate::document::Document;
    use crate::error::{RagError, Result};

    /// Loads a PDF and merges all of its pages into one [`Document`].
    ///
    /// `location` may be an `http://` or `https://` URL, a `file://` URL, or a
    /// plain filesystem path. Text extraction runs on the blocking pool.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use pdfqa_rag::{DocumentLoader, PdfLoader};
    ///
    /// let docs = PdfLoader::new().load("https://example.com/paper.pdf").await?;
    /// assert_eq!(docs.len(), 1);
    /// ```
    #[derive(Debug, Clone, Default)]
    pub struct PdfLoader {
        client: reqwest::Client,
    }

    impl PdfLoader {
        /// Create a loader with a default HTTP client.
        pub fn new() -> Self {
            Self::default()
        }

        async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
            if is_remote(location) {
                let response = self
                    .client
                    .get(location)
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .map_err(|e| load_error(location, format!("request failed: {e}")))?;
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| load_error(location, format!("failed to read body: {e}")))?;
                Ok(bytes.to_vec())
            } else {
                let path = location.strip_prefix("file://").unwrap_or(location);
                tokio::fs::read(path)
                    .await
                    .map_err(|e| load_error(location, format!("failed to read file: {e}")))
            }
        }
    }

    fn is_remote(location: &str) -> bool {
        location.starts_with("http://") || location.starts_with("https://")
    }

    fn load_error(location: &str, message: String) -> RagError {
        error!(location, %message, "document load failed");
        RagError::LoadError { location: location.to_string(), message }
    }

    async fn extract_text(location: &str, bytes: Vec<u8>) -> Result<String> {
        let extracted =
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                .await
                .map_err(|e| load_error(location, format!("PDF parser aborted: {e}")))?;
        extracted.map_err(|e| load_error(location, format!("failed to parse PDF: {e}")))
    }

    #[async_trait]
    impl DocumentLoader for PdfLoader {
        async fn load(&self, location: &str) -> Result<Vec<Document>> {
            let bytes = self.fetch(location).await?;
            debug!(location, bytes = bytes.len(), "fetched PDF");

            let text = extract_text(location, bytes).await?;
            if text.trim().is_empty() {
                return Err(load_error(location, "PDF contains no extractable text".into()));
            }

            info!(location, chars = text.chars().count(), "loaded PDF");
            Ok(vec![Document::new(Uuid::new_v4().to_string(), text, location)])
        }
    }

}
