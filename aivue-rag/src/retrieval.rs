//! Top-K passage retrieval across documents.

use tracing::debug;

use crate::context::build_context;
use crate::document::{Chunk, Document, RetrievalResult};
use crate::scoring::score_lowered;

/// Rank every chunk of `documents` against `query` and keep the best `top_k`.
///
/// All chunks are pooled into one candidate list and scored against that pool.
/// Sorting is stable and descending, so equal scores keep the order in which
/// the chunks were encountered. Fewer than `top_k` candidates are all
/// returned. No candidates is not an error: the result is empty with an empty
/// context string.
pub fn retrieve(query: &str, documents: &[Document], top_k: usize) -> RetrievalResult {
    let candidates: Vec<&Chunk> = documents.iter().flat_map(|d| d.chunks.iter()).collect();
    if candidates.is_empty() {
        debug!(document_count = documents.len(), "no chunks to retrieve from");
        return RetrievalResult::default();
    }

    let lowered: Vec<String> = candidates.iter().map(|c| c.content.to_lowercase()).collect();

    let mut scored: Vec<(&Chunk, f64)> = candidates
        .iter()
        .map(|chunk| (*chunk, score_lowered(query, &chunk.content, &lowered)))
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);

    let (chunks, scores): (Vec<Chunk>, Vec<f64>) =
        scored.into_iter().map(|(chunk, score)| (chunk.clone(), score)).unzip();

    let mut result = RetrievalResult { chunks, scores, context: String::new() };
    result.context = build_context(&result);

    debug!(
        candidate_count = candidates.len(),
        result_count = result.len(),
        top_k,
        "retrieved chunks"
    );
    result
}
