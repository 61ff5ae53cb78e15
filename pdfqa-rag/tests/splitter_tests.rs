//! Properties of the recursive character splitter at the service settings
//! (500 characters, 100 overlap).

use pdfqa_rag::chunking::{Chunker, RecursiveCharacterSplitter};
use pdfqa_rag::document::Document;
use proptest::prelude::*;

const CHUNK_SIZE: usize = 500;
const OVERLAP: usize = 100;

fn splitter() -> RecursiveCharacterSplitter {
    RecursiveCharacterSplitter::new(CHUNK_SIZE, OVERLAP)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Text without any separator is cut into sliding windows:
    /// ceil((L - overlap) / (size - overlap)) chunks.
    #[test]
    fn separator_free_text_chunk_count(len in 501usize..5000) {
        let text = "a".repeat(len);
        let chunks = splitter().split_text(&text);

        let step = CHUNK_SIZE - OVERLAP;
        let expected = (len - OVERLAP).div_ceil(step);
        prop_assert_eq!(chunks.len(), expected);
        prop_assert!(chunks.iter().all(|c| c.chars().count() <= CHUNK_SIZE));
    }

    /// Consecutive full windows share exactly `OVERLAP` characters.
    #[test]
    fn separator_free_windows_overlap(len in 1000usize..3000) {
        let text: String = (0..len).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let chunks = splitter().split_text(&text);

        for pair in chunks.windows(2) {
            let tail: String = pair[0].chars().skip(CHUNK_SIZE - OVERLAP).collect();
            prop_assert!(pair[1].starts_with(&tail));
        }
    }

    /// Prose never produces chunks longer than the configured size, and the
    /// split is deterministic.
    #[test]
    fn prose_chunks_are_bounded_and_deterministic(
        words in proptest::collection::vec("[a-zA-Z]{1,12}", 1..400),
        paragraph_every in 5usize..60,
    ) {
        let mut text = String::new();
        for (i, word) in words.iter().enumerate() {
            if i > 0 {
                text.push_str(if i % paragraph_every == 0 { "\n\n" } else { " " });
            }
            text.push_str(word);
        }

        let document = Document::new("doc", text.clone(), "generated.pdf");
        let first = splitter().chunk(&document);
        let second = splitter().chunk(&document);

        prop_assert_eq!(&first, &second);
        prop_assert!(!first.is_empty());
        for chunk in &first {
            prop_assert!(chunk.text.chars().count() <= CHUNK_SIZE);
            prop_assert!(!chunk.text.is_empty());
            prop_assert_eq!(chunk.source(), "generated.pdf");
        }
    }

    /// Every word of the input survives into some chunk.
    #[test]
    fn no_words_are_lost(words in proptest::collection::vec("[a-z]{1,10}", 1..300)) {
        let text = words.join(" ");
        let chunks = splitter().split_text(&text);

        for word in &words {
            prop_assert!(chunks.iter().any(|c| c.split(' ').any(|w| w == word.as_str())));
        }
    }
}

#[test]
fn a_short_pdf_sentence_is_one_chunk() {
    let document = Document::new("doc", "The capital of France is Paris.", "france.pdf");
    let chunks = splitter().chunk(&document);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "The capital of France is Paris.");
    assert_eq!(chunks[0].id, "doc_0");
}
