//! Property tests for ranking and context assembly.

use aivue_rag::{
    ChunkingOptions, Document, RetrievalResult, SourceKind, build_context, chunk_text, retrieve,
    score,
};
use proptest::prelude::*;

const VOCABULARY: &[&str] =
    &["red", "shoes", "blue", "hats", "green", "gloves", "sale", "store", "price", "size"];

/// Generate a sentence over a small vocabulary so queries hit some chunks.
fn arb_sentence() -> impl Strategy<Value = String> {
    proptest::collection::vec(proptest::sample::select(VOCABULARY), 1..10).prop_map(|w| w.join(" "))
}

/// Generate a chunked document whose paragraphs are sentences.
fn arb_document(id: usize) -> impl Strategy<Value = Document> {
    proptest::collection::vec(arb_sentence(), 0..6).prop_map(move |paragraphs| {
        let text = paragraphs.join("\n\n");
        let doc_id = format!("doc{id}");
        let options = ChunkingOptions { chunk_size: 8, overlap: 2, preserve_paragraphs: true };
        let chunks = chunk_text(&text, &doc_id, &doc_id, &options).unwrap();
        Document::new(doc_id.clone(), doc_id, SourceKind::Text, text).with_chunks(chunks)
    })
}

fn arb_documents() -> impl Strategy<Value = Vec<Document>> {
    (0usize..4).prop_flat_map(|n| (0..n).map(arb_document).collect::<Vec<_>>())
}

/// **Property: retrieval is bounded and well formed**
/// *For any* documents and `top_k`, the result holds `min(top_k, candidates)`
/// chunks, a parallel score list in descending order, and a context built
/// from exactly those chunks.
mod prop_retrieval_shape {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn result_is_bounded_sorted_and_parallel(
            documents in arb_documents(),
            query in arb_sentence(),
            top_k in 0usize..12,
        ) {
            let candidates: usize = documents.iter().map(|d| d.chunks.len()).sum();
            let result = retrieve(&query, &documents, top_k);

            prop_assert_eq!(result.chunks.len(), top_k.min(candidates));
            prop_assert_eq!(result.chunks.len(), result.scores.len());
            for window in result.scores.windows(2) {
                prop_assert!(window[0] >= window[1], "scores not descending: {:?}", result.scores);
            }
            prop_assert_eq!(&result.context, &build_context(&result));
            for chunk in &result.chunks {
                let label = format!("[From {}]:", chunk.document_name);
                prop_assert!(result.context.contains(&label));
            }
        }

        #[test]
        fn scores_match_pairwise_scoring(
            documents in arb_documents(),
            query in arb_sentence(),
        ) {
            let pool: Vec<_> = documents.iter().flat_map(|d| d.chunks.clone()).collect();
            let result = retrieve(&query, &documents, pool.len());
            for (chunk, s) in result.iter() {
                prop_assert_eq!(s.to_bits(), score(&query, &chunk.content, &pool).to_bits());
            }
        }
    }
}

#[test]
fn no_documents_yield_the_empty_result() {
    let result = retrieve("red shoes", &[], 3);
    assert_eq!(result, RetrievalResult { chunks: vec![], scores: vec![], context: String::new() });
}

#[test]
fn exact_phrase_outranks_unrelated_chunk() {
    let text = "These red shoes are on sale.\n\nOur hats come in blue.";
    let options = ChunkingOptions { chunk_size: 6, overlap: 0, preserve_paragraphs: true };
    let chunks = chunk_text(text, "catalog", "Catalog", &options).unwrap();
    assert_eq!(chunks.len(), 2);

    let with_phrase = score("red shoes", &chunks[0].content, &chunks);
    let without = score("red shoes", &chunks[1].content, &chunks);
    assert!(with_phrase > without);

    let doc = Document::new("catalog", "Catalog", SourceKind::Text, text).with_chunks(chunks);
    let result = retrieve("red shoes", &[doc], 1);
    assert_eq!(result.context, "[From Catalog]:\nThese red shoes are on sale.");
}
