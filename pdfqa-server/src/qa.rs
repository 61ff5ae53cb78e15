//! Store and search flows behind the HTTP handlers.

use std::sync::Arc;

use pdfqa_model::{CompletionModel, PromptTemplate};
use pdfqa_rag::{DocumentLoader, RagPipeline};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;

/// A retrieved chunk shown to the caller next to the answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Background {
    pub content: String,
    pub source: String,
}

/// The answer to a question and the background it was generated from, most
/// similar chunk first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub completion: String,
    pub background: Vec<Background>,
}

/// Question answering over one index.
///
/// Every collaborator is shared, so one service instance serves all requests.
pub struct QaService {
    loader: Arc<dyn DocumentLoader>,
    pipeline: RagPipeline,
    model: Arc<dyn CompletionModel>,
    prompt: PromptTemplate,
    collection: String,
}

impl QaService {
    pub fn new(
        loader: Arc<dyn DocumentLoader>,
        pipeline: RagPipeline,
        model: Arc<dyn CompletionModel>,
        prompt: PromptTemplate,
        collection: impl Into<String>,
    ) -> Self {
        Self { loader, pipeline, model, prompt, collection: collection.into() }
    }

    /// Load the PDF at `location`, split it and index every chunk.
    ///
    /// Returns the number of chunks written.
    pub async fn store(&self, location: &str) -> Result<usize, ApiError> {
        let documents = self.loader.load(location).await?;
        let chunks = self.pipeline.ingest_batch(&self.collection, &documents).await?;

        info!(
            location,
            collection = %self.collection,
            documents = documents.len(),
            chunks = chunks.len(),
            "stored document embeddings"
        );
        Ok(chunks.len())
    }

    /// Answer `question` from the closest indexed chunks.
    pub async fn search(&self, question: &str) -> Result<Answer, ApiError> {
        let results = self.pipeline.query(&self.collection, question).await?;
        debug!(collection = %self.collection, retrieved = results.len(), "retrieved background");

        let texts: Vec<&str> = results.iter().map(|r| r.chunk.text.as_str()).collect();
        let prompt = self.prompt.render(&texts, question)?;
        let completion = self.model.complete(&prompt).await?;

        let background = results
            .into_iter()
            .map(|r| Background { source: r.chunk.source().to_string(), content: r.chunk.text })
            .collect();

        info!(collection = %self.collection, model = self.model.name(), "answered question");
        Ok(Answer { completion, background })
    }
}
