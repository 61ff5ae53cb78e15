//! Document chunking.
//!
//! This module provides the [`Chunker`] trait and [`RecursiveCharacterSplitter`],
//! which splits on the coarsest separator present in the text (paragraphs,
//! then lines, then words, then characters) and merges the pieces back into
//! overlapping windows of bounded size.

use std::collections::VecDeque;

use tracing::warn;

use crate::document::{Chunk, Document};

/// Separators tried in order, coarsest first. The empty separator splits
/// between characters and always applies.
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and metadata but no embeddings.
/// Embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks.
    ///
    /// Returns an empty `Vec` if the document has empty text.
    /// Each returned chunk has an empty embedding vector.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

/// Recursive character text splitter.
///
/// Lengths are measured in characters, not bytes. Chunk IDs are generated as
/// `{document_id}_{chunk_index}` and each chunk inherits the parent document's
/// metadata plus a `chunk_index` field.
///
/// # Example
///
/// ```rust,ignore
/// use pdfqa_rag::RecursiveCharacterSplitter;
///
/// let splitter = RecursiveCharacterSplitter::new(500, 100);
/// let chunks = splitter.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveCharacterSplitter {
    /// Create a splitter using [`DEFAULT_SEPARATORS`].
    ///
    /// # Arguments
    ///
    /// * `chunk_size`: maximum number of characters per chunk
    /// * `chunk_overlap`: maximum number of characters shared by consecutive chunks
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Split raw text into chunk strings.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut separator = separators.last().map(String::as_str).unwrap_or_default();
        let mut finer: &[String] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate;
                finer = &separators[i + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut pending: Vec<&str> = Vec::new();

        for piece in split_on(text, separator) {
            if char_len(piece) < self.chunk_size {
                pending.push(piece);
                continue;
            }

            if !pending.is_empty() {
                chunks.extend(self.merge_splits(&pending, separator));
                pending.clear();
            }
            if finer.is_empty() {
                chunks.push(piece.to_string());
            } else {
                chunks.extend(self.split_recursive(piece, finer));
            }
        }

        if !pending.is_empty() {
            chunks.extend(self.merge_splits(&pending, separator));
        }

        chunks
    }

    /// Greedily join pieces into chunks of at most `chunk_size` characters,
    /// keeping a tail of at most `chunk_overlap` characters between chunks.
    fn merge_splits(&self, pieces: &[&str], separator: &str) -> Vec<String> {
        let separator_len = char_len(separator);
        let mut merged = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);
            let join_cost = if window.is_empty() { 0 } else { separator_len };

            if total + len + join_cost > self.chunk_size {
                if total > self.chunk_size {
                    warn!(
                        size = total,
                        chunk_size = self.chunk_size,
                        "created a chunk longer than the configured size"
                    );
                }
                if !window.is_empty() {
                    if let Some(text) = join_window(&window, separator) {
                        merged.push(text);
                    }
                    while total > self.chunk_overlap
                        || (total > 0
                            && total + len + if window.is_empty() { 0 } else { separator_len }
                                > self.chunk_size)
                    {
                        let trailing = if window.len() > 1 { separator_len } else { 0 };
                        let Some(first) = window.pop_front() else {
                            break;
                        };
                        total = total.saturating_sub(char_len(first) + trailing);
                    }
                }
            }

            window.push_back(piece);
            total += len + if window.len() > 1 { separator_len } else { 0 };
        }

        if let Some(text) = join_window(&window, separator) {
            merged.push(text);
        }
        merged
    }
}

impl Chunker for RecursiveCharacterSplitter {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        self.split_text(&document.text)
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let mut metadata = document.metadata.clone();
                metadata.insert("chunk_index".to_string(), i.to_string());
                Chunk {
                    id: format!("{}_{i}", document.id),
                    text,
                    embedding: Vec::new(),
                    metadata,
                    document_id: document.id.clone(),
                }
            })
            .collect()
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split on `separator`, or between characters when it is empty. Empty pieces are dropped.
fn split_on<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        text.char_indices().map(|(i, c)| &text[i..i + c.len_utf8()]).collect()
    } else {
        text.split(separator).filter(|piece| !piece.is_empty()).collect()
    }
}

fn join_window(window: &VecDeque<&str>, separator: &str) -> Option<String> {
    let joined = window.iter().copied().collect::<Vec<_>>().join(separator);
    let trimmed = joined.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Document {
        Document::new("doc", text, "test.pdf")
    }

    #[test]
    fn empty_document_yields_no_chunks() {
        let splitter = RecursiveCharacterSplitter::new(500, 100);
        assert!(splitter.chunk(&doc("")).is_empty());
    }

    #[test]
    fn short_text_is_a_single_trimmed_chunk() {
        let splitter = RecursiveCharacterSplitter::new(500, 100);
        let chunks = splitter.split_text("  The capital of France is Paris.  ");
        assert_eq!(chunks, vec!["The capital of France is Paris.".to_string()]);
    }

    #[test]
    fn separator_free_text_uses_sliding_windows() {
        let splitter = RecursiveCharacterSplitter::new(500, 100);
        let text = "x".repeat(1000);
        let chunks = splitter.split_text(&text);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 500);
        assert_eq!(chunks[1].len(), 500);
        assert_eq!(chunks[2].len(), 200);
    }

    #[test]
    fn words_are_merged_with_overlap() {
        let splitter = RecursiveCharacterSplitter::new(10, 4);
        let chunks = splitter.split_text("aaa bbb ccc ddd");
        assert_eq!(chunks, vec!["aaa bbb", "bbb ccc", "ccc ddd"]);
    }

    #[test]
    fn paragraphs_split_before_words() {
        let splitter = RecursiveCharacterSplitter::new(20, 0);
        let chunks = splitter.split_text("first paragraph\n\nsecond paragraph");
        assert_eq!(chunks, vec!["first paragraph", "second paragraph"]);
    }

    #[test]
    fn oversized_paragraph_recurses_into_words() {
        let splitter = RecursiveCharacterSplitter::new(12, 0);
        let chunks = splitter.split_text("short\n\none two three four five");
        assert_eq!(chunks, vec!["short", "one two", "three four", "five"]);
        assert!(chunks.iter().all(|c| c.chars().count() <= 12));
    }

    #[test]
    fn multibyte_text_never_splits_inside_a_character() {
        let splitter = RecursiveCharacterSplitter::new(5, 1);
        let chunks = splitter.split_text("ééééééééé");
        assert!(chunks.iter().all(|c| c.chars().count() <= 5));
        assert_eq!(chunks[0], "ééééé");
    }

    #[test]
    fn chunks_inherit_metadata_and_get_indexed_ids() {
        let splitter = RecursiveCharacterSplitter::new(10, 0);
        let chunks = splitter.chunk(&doc("alpha beta gamma delta"));

        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.id, format!("doc_{i}"));
            assert_eq!(chunk.document_id, "doc");
            assert_eq!(chunk.source(), "test.pdf");
            assert_eq!(chunk.metadata["chunk_index"], i.to_string());
            assert!(chunk.embedding.is_empty());
        }
    }
}
