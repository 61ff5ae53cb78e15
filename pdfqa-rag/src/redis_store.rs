//! Redis vector store backend.
//!
//! Provides [`RedisVectorStore`] which implements [`VectorStore`] on top of
//! RediSearch vector similarity. Each collection is one RediSearch index over
//! hashes stored under `doc:<index>:<uuid>`:
//!
//! | Field            | Content                                  |
//! |------------------|------------------------------------------|
//! | `content`        | chunk text                               |
//! | `metadata`       | chunk metadata as a JSON object          |
//! | `content_vector` | embedding as little-endian `f32` bytes   |
//!
//! Every call opens its own connection and drops it before returning.
//!
//! # Example
//!
//! ```rust,ignore
//! use pdfqa_rag::redis_store::RedisVectorStore;
//!
//! let store = RedisVectorStore::new("redis://localhost:6379")?;
//! store.upsert("docs", &chunks).await?;
//! let results = store.search("docs", &query_embedding, 10).await?;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use redis::Value;
use redis::aio::MultiplexedConnection;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

const CONTENT_FIELD: &str = "content";
const METADATA_FIELD: &str = "metadata";
const VECTOR_FIELD: &str = "content_vector";
const SCORE_FIELD: &str = "vector_score";
const DOCUMENT_ID_KEY: &str = "document_id";

/// A [`VectorStore`] backed by Redis with the RediSearch module.
///
/// Holds a [`redis::Client`], which only stores connection info; connections
/// are opened per operation.
pub struct RedisVectorStore {
    client: redis::Client,
}

impl RedisVectorStore {
    /// Create a store for the given Redis URL (e.g. `redis://localhost:6379`).
    ///
    /// Only validates the URL; no connection is made until the first operation.
    pub fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(Self::map_err)?;
        Ok(Self { client })
    }

    fn map_err(e: redis::RedisError) -> RagError {
        RagError::VectorStoreError { backend: "redis".to_string(), message: e.to_string() }
    }

    fn malformed(message: impl Into<String>) -> RagError {
        RagError::VectorStoreError { backend: "redis".to_string(), message: message.into() }
    }

    async fn connect(&self) -> Result<MultiplexedConnection> {
        self.client.get_multiplexed_async_connection().await.map_err(Self::map_err)
    }

    async fn ensure_index(
        conn: &mut MultiplexedConnection,
        index: &str,
        dimensions: usize,
    ) -> Result<()> {
        let existing: Vec<String> =
            redis::cmd("FT._LIST").query_async(&mut *conn).await.map_err(Self::map_err)?;
        if existing.iter().any(|name| name == index) {
            let info: Value = redis::cmd("FT.INFO")
                .arg(index)
                .query_async(&mut *conn)
                .await
                .map_err(Self::map_err)?;
            return check_dimensions(index, indexed_dimensions(&info), dimensions);
        }

        let created: redis::RedisResult<()> =
            create_index_cmd(index, dimensions).query_async(&mut *conn).await;
        match created {
            Ok(()) => {
                info!(index, dimensions, "created redis vector index");
                Ok(())
            }
            // Another writer created it between FT._LIST and FT.CREATE.
            Err(e) if index_already_exists(&e.to_string()) => Ok(()),
            Err(e) => Err(Self::map_err(e)),
        }
    }
}

/// Hash key prefix for entries of `index`.
fn key_prefix(index: &str) -> String {
    format!("doc:{index}:")
}

fn vector_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn create_index_cmd(index: &str, dimensions: usize) -> redis::Cmd {
    let mut cmd = redis::cmd("FT.CREATE");
    cmd.arg(index)
        .arg("ON")
        .arg("HASH")
        .arg("PREFIX")
        .arg(1)
        .arg(key_prefix(index))
        .arg("SCHEMA")
        .arg(CONTENT_FIELD)
        .arg("TEXT")
        .arg(METADATA_FIELD)
        .arg("TEXT")
        .arg(VECTOR_FIELD)
        .arg("VECTOR")
        .arg("HNSW")
        .arg(6)
        .arg("TYPE")
        .arg("FLOAT32")
        .arg("DIM")
        .arg(dimensions)
        .arg("DISTANCE_METRIC")
        .arg("COSINE");
    cmd
}

fn search_cmd(index: &str, embedding: &[f32], top_k: usize) -> redis::Cmd {
    let mut cmd = redis::cmd("FT.SEARCH");
    cmd.arg(index)
        .arg(format!("*=>[KNN {top_k} @{VECTOR_FIELD} $vector AS {SCORE_FIELD}]"))
        .arg("PARAMS")
        .arg(2)
        .arg("vector")
        .arg(vector_to_bytes(embedding))
        .arg("RETURN")
        .arg(3)
        .arg(CONTENT_FIELD)
        .arg(METADATA_FIELD)
        .arg(SCORE_FIELD)
        .arg("SORTBY")
        .arg(SCORE_FIELD)
        .arg("ASC")
        .arg("LIMIT")
        .arg(0)
        .arg(top_k)
        .arg("DIALECT")
        .arg(2);
    cmd
}

/// Whether an `FT.CREATE` failure means the index is already there. The client
/// renders the server's `Index already exists` reply as `Index: already exists`.
fn index_already_exists(message: &str) -> bool {
    let words: Vec<&str> = message
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .collect();
    words.windows(3).any(|w| w == ["Index", "already", "exists"])
}

/// Value following `name` in a flat `[name, value, ...]` list.
fn field<'a>(fields: &'a [Value], name: &str) -> Option<&'a Value> {
    fields.chunks(2).find_map(|pair| match pair {
        [key, value] if value_to_string(key).is_ok_and(|k| k.eq_ignore_ascii_case(name)) => {
            Some(value)
        }
        _ => None,
    })
}

/// Dimension of the vector field as reported by `FT.INFO`, when the server
/// lists it under the field's attributes.
fn indexed_dimensions(info: &Value) -> Option<usize> {
    let Value::Array(items) = info else {
        return None;
    };
    let Some(Value::Array(attributes)) = field(items, "attributes") else {
        return None;
    };

    attributes.iter().find_map(|attribute| {
        let Value::Array(fields) = attribute else {
            return None;
        };
        if value_to_string(field(fields, "identifier")?).ok()? != VECTOR_FIELD {
            return None;
        }
        match field(fields, "dim")? {
            Value::Int(n) => usize::try_from(*n).ok(),
            other => value_to_string(other).ok()?.parse().ok(),
        }
    })
}

/// An existing index only accepts vectors of the size it was created with.
fn check_dimensions(index: &str, indexed: Option<usize>, dimensions: usize) -> Result<()> {
    match indexed {
        Some(indexed) if indexed != dimensions => Err(RedisVectorStore::malformed(format!(
            "index '{index}' holds {indexed}-dimensional vectors, got {dimensions}"
        ))),
        Some(_) => {
            debug!(index, "redis index already exists, skipping creation");
            Ok(())
        }
        None => {
            warn!(index, dimensions, "FT.INFO did not report the vector dimension");
            Ok(())
        }
    }
}

fn metadata_json(chunk: &Chunk) -> Result<String> {
    let mut metadata = chunk.metadata.clone();
    metadata.insert(DOCUMENT_ID_KEY.to_string(), chunk.document_id.clone());
    serde_json::to_string(&metadata).map_err(|e| {
        RedisVectorStore::malformed(format!("failed to encode metadata for chunk '{}': {e}", chunk.id))
    })
}

/// Parse metadata written by [`metadata_json`]. Non-string JSON values are kept
/// in their JSON text form.
fn parse_metadata(raw: &str) -> HashMap<String, String> {
    let Ok(map) = serde_json::from_str::<HashMap<String, serde_json::Value>>(raw) else {
        return HashMap::new();
    };
    map.into_iter()
        .map(|(k, v)| match v {
            serde_json::Value::String(s) => (k, s),
            other => (k, other.to_string()),
        })
        .collect()
}

fn value_to_string(value: &Value) -> Result<String> {
    redis::from_redis_value::<String>(value).map_err(RedisVectorStore::map_err)
}

/// Turn an `FT.SEARCH` reply into results ordered by descending similarity.
///
/// The RESP2 reply is `[total, key, [field, value, ...], key, [...], ...]`.
/// RediSearch reports cosine distance; the score is `1 - distance`.
fn parse_search_reply(index: &str, reply: Value) -> Result<Vec<SearchResult>> {
    let Value::Array(items) = reply else {
        return Err(RedisVectorStore::malformed("FT.SEARCH reply is not an array"));
    };

    let prefix = key_prefix(index);
    let mut results = Vec::new();
    let mut entries = items.into_iter().skip(1);

    while let Some(key) = entries.next() {
        let key = value_to_string(&key)?;
        let Some(Value::Array(fields)) = entries.next() else {
            return Err(RedisVectorStore::malformed(format!("missing fields for key '{key}'")));
        };

        let mut text = String::new();
        let mut metadata = HashMap::new();
        let mut distance: Option<f32> = None;

        for pair in fields.chunks(2) {
            let [name, value] = pair else { continue };
            match value_to_string(name)?.as_str() {
                CONTENT_FIELD => text = value_to_string(value)?,
                METADATA_FIELD => metadata = parse_metadata(&value_to_string(value)?),
                SCORE_FIELD => {
                    let raw = value_to_string(value)?;
                    distance = Some(raw.parse().map_err(|_| {
                        RedisVectorStore::malformed(format!("invalid vector score '{raw}'"))
                    })?);
                }
                _ => {}
            }
        }

        let document_id = metadata.remove(DOCUMENT_ID_KEY).unwrap_or_default();
        let id = key.strip_prefix(&prefix).unwrap_or(&key).to_string();

        results.push(SearchResult {
            chunk: Chunk { id, text, embedding: Vec::new(), metadata, document_id },
            score: 1.0 - distance.unwrap_or(1.0),
        });
    }

    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(results)
}

#[async_trait]
impl VectorStore for RedisVectorStore {
    fn backend(&self) -> &str {
        "redis"
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        let Some(first) = chunks.first() else {
            return Ok(());
        };
        let dimensions = first.embedding.len();
        if dimensions == 0 {
            return Err(RedisVectorStore::malformed("chunks must have embeddings set"));
        }
        if let Some(bad) = chunks.iter().find(|c| c.embedding.len() != dimensions) {
            return Err(RedisVectorStore::malformed(format!(
                "chunk '{}' has {} dimensions, expected {dimensions}",
                bad.id,
                bad.embedding.len()
            )));
        }

        let mut conn = self.connect().await?;
        Self::ensure_index(&mut conn, collection, dimensions).await?;

        let prefix = key_prefix(collection);
        let mut pipe = redis::pipe();
        for chunk in chunks {
            pipe.cmd("HSET")
                .arg(format!("{prefix}{}", Uuid::new_v4()))
                .arg(CONTENT_FIELD)
                .arg(&chunk.text)
                .arg(METADATA_FIELD)
                .arg(metadata_json(chunk)?)
                .arg(VECTOR_FIELD)
                .arg(vector_to_bytes(&chunk.embedding))
                .ignore();
        }
        let _: () = pipe.query_async(&mut conn).await.map_err(Self::map_err)?;

        debug!(collection, count = chunks.len(), "upserted chunks to redis");
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let mut conn = self.connect().await?;
        let reply: Value = search_cmd(collection, embedding, top_k)
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        let results = parse_search_reply(collection, reply)?;
        debug!(collection, count = results.len(), "redis similarity search completed");
        Ok(results)
    }
}
