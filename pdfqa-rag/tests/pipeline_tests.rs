//! Pipeline behaviour with a deterministic embedder and the in-memory store.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use pdfqa_rag::{
    Chunk, Chunker, Document, EmbeddingProvider, InMemoryVectorStore, RagConfig, RagError,
    RagPipeline, SearchResult, VectorStore,
};

const DIM: usize = 64;

/// Bag-of-words embedder: each lowercase word is hashed into one dimension.
#[derive(Default)]
struct WordHashEmbedder {
    calls: AtomicUsize,
}

fn word_vector(text: &str) -> Vec<f32> {
    let mut v = vec![0.0f32; DIM];
    for word in text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
        let hash = word
            .to_lowercase()
            .bytes()
            .fold(0xcbf29ce484222325u64, |acc, b| (acc ^ b as u64).wrapping_mul(0x100000001b3));
        v[(hash % DIM as u64) as usize] += 1.0;
    }
    v
}

#[async_trait]
impl EmbeddingProvider for WordHashEmbedder {
    async fn embed(&self, text: &str) -> pdfqa_rag::Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(word_vector(text))
    }

    fn dimensions(&self) -> usize {
        DIM
    }
}

struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> pdfqa_rag::Result<Vec<f32>> {
        Err(RagError::EmbeddingError { provider: "test".into(), message: "quota exceeded".into() })
    }

    fn dimensions(&self) -> usize {
        DIM
    }
}

struct UnreachableStore;

#[async_trait]
impl VectorStore for UnreachableStore {
    fn backend(&self) -> &str {
        "unreachable"
    }

    async fn upsert(&self, _collection: &str, _chunks: &[Chunk]) -> pdfqa_rag::Result<()> {
        Err(RagError::VectorStoreError {
            backend: "unreachable".into(),
            message: "connection refused".into(),
        })
    }

    async fn search(
        &self,
        _collection: &str,
        _embedding: &[f32],
        _top_k: usize,
    ) -> pdfqa_rag::Result<Vec<SearchResult>> {
        Err(RagError::VectorStoreError {
            backend: "unreachable".into(),
            message: "connection refused".into(),
        })
    }
}

fn pipeline_with(
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
) -> RagPipeline {
    RagPipeline::builder()
        .config(RagConfig::default())
        .embedding_provider(embedder)
        .vector_store(store)
        .build()
        .unwrap()
}

fn facts_document() -> Document {
    let mut text = String::new();
    for i in 0..40 {
        text.push_str(&format!("Bananas are yellow fruit number {i} rich in potassium. "));
    }
    text.push_str("\n\nThe capital of France is Paris.\n\n");
    for i in 0..40 {
        text.push_str(&format!("Mount Everest is the tallest mountain, fact {i}. "));
    }
    Document::new("facts", text, "facts.pdf")
}

#[tokio::test]
async fn ingest_then_query_finds_the_relevant_chunk_first() {
    let pipeline =
        pipeline_with(Arc::new(WordHashEmbedder::default()), Arc::new(InMemoryVectorStore::new()));

    let stored = pipeline.ingest("docs", &facts_document()).await.unwrap();
    assert!(stored.len() > 1);
    assert!(stored.iter().all(|c| c.embedding.len() == DIM));

    let results = pipeline.query("docs", "What is the capital of France?").await.unwrap();
    assert!(!results.is_empty());
    assert!(results.len() <= 10);
    assert!(results[0].chunk.text.contains("Paris"));
    assert_eq!(results[0].chunk.source(), "facts.pdf");
    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[tokio::test]
async fn query_returns_at_most_top_k() {
    let pipeline =
        pipeline_with(Arc::new(WordHashEmbedder::default()), Arc::new(InMemoryVectorStore::new()));

    let long = Document::new("long", "word ".repeat(20_000), "long.pdf");
    let stored = pipeline.ingest("docs", &long).await.unwrap();
    assert!(stored.len() > 10);

    let results = pipeline.query("docs", "word").await.unwrap();
    assert_eq!(results.len(), 10);
}

#[tokio::test]
async fn ingest_batch_embeds_every_chunk_once() {
    let embedder = Arc::new(WordHashEmbedder::default());
    let pipeline = pipeline_with(embedder.clone(), Arc::new(InMemoryVectorStore::new()));

    let docs = vec![
        Document::new("a", "Alpha document text.", "a.pdf"),
        Document::new("b", "Beta document text.", "b.pdf"),
    ];
    let chunks = pipeline.ingest_batch("docs", &docs).await.unwrap();

    assert_eq!(chunks.len(), 2);
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn empty_document_is_not_embedded() {
    let embedder = Arc::new(WordHashEmbedder::default());
    let pipeline = pipeline_with(embedder.clone(), Arc::new(InMemoryVectorStore::new()));

    let chunks = pipeline.ingest("docs", &Document::new("e", "", "e.pdf")).await.unwrap();
    assert!(chunks.is_empty());
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn embedding_failure_surfaces_as_embedding_error() {
    let pipeline = pipeline_with(Arc::new(FailingEmbedder), Arc::new(InMemoryVectorStore::new()));

    let err = pipeline.ingest("docs", &facts_document()).await.unwrap_err();
    assert!(matches!(err, RagError::EmbeddingError { .. }), "got {err}");
}

#[tokio::test]
async fn store_failure_surfaces_as_store_error() {
    let pipeline =
        pipeline_with(Arc::new(WordHashEmbedder::default()), Arc::new(UnreachableStore));

    let err = pipeline.ingest("docs", &facts_document()).await.unwrap_err();
    match err {
        RagError::StoreError { collection, message } => {
            assert_eq!(collection, "docs");
            assert!(message.contains("connection refused"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn search_failure_surfaces_as_query_error() {
    let pipeline =
        pipeline_with(Arc::new(WordHashEmbedder::default()), Arc::new(UnreachableStore));
    let err = pipeline.query("docs", "anything").await.unwrap_err();
    assert!(matches!(err, RagError::QueryError { .. }));

    let empty =
        pipeline_with(Arc::new(WordHashEmbedder::default()), Arc::new(InMemoryVectorStore::new()));
    let err = empty.query("docs", "anything").await.unwrap_err();
    assert!(matches!(err, RagError::QueryError { .. }), "missing index must be a query error");
}

#[tokio::test]
async fn similarity_threshold_filters_weak_matches() {
    let config = RagConfig::builder().similarity_threshold(0.99).build().unwrap();
    let pipeline = RagPipeline::builder()
        .config(config)
        .embedding_provider(Arc::new(WordHashEmbedder::default()))
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .build()
        .unwrap();

    pipeline.ingest("docs", &Document::new("d", "completely unrelated words", "d.pdf")).await.unwrap();
    let results = pipeline.query("docs", "capital France").await.unwrap();
    assert!(results.is_empty());
}

#[test]
fn builder_requires_collaborators() {
    let err = RagPipeline::builder().build().err().unwrap();
    assert!(matches!(err, RagError::ConfigError(_)));
}

#[tokio::test]
async fn default_splitter_follows_the_configured_chunk_sizes() {
    let config = RagConfig::builder().chunk_size(10).chunk_overlap(4).build().unwrap();
    let pipeline = RagPipeline::builder()
        .config(config)
        .embedding_provider(Arc::new(WordHashEmbedder::default()))
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .build()
        .unwrap();

    let stored =
        pipeline.ingest("docs", &Document::new("d", "aaa bbb ccc ddd", "d.pdf")).await.unwrap();
    let texts: Vec<&str> = stored.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, ["aaa bbb", "bbb ccc", "ccc ddd"]);
}

/// Keeps each document whole.
struct WholeDocumentChunker;

impl Chunker for WholeDocumentChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        vec![Chunk {
            id: format!("{}_0", document.id),
            text: document.text.clone(),
            embedding: Vec::new(),
            metadata: document.metadata.clone(),
            document_id: document.id.clone(),
        }]
    }
}

#[tokio::test]
async fn explicit_chunker_replaces_the_default_splitter() {
    let pipeline = RagPipeline::builder()
        .embedding_provider(Arc::new(WordHashEmbedder::default()))
        .vector_store(Arc::new(InMemoryVectorStore::new()))
        .chunker(Arc::new(WholeDocumentChunker))
        .build()
        .unwrap();

    let text = "Bananas are yellow. ".repeat(100);
    let stored = pipeline.ingest("docs", &Document::new("d", text.as_str(), "d.pdf")).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].text, text);
    assert_eq!(stored[0].source(), "d.pdf");
}
