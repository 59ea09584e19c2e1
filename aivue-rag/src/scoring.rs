//! Keyword relevance scoring.
//!
//! The score is a TF-IDF-like sum over query terms:
//!
//! ```text
//! score = Σ  tf(t) · ln(N / (df(t) + 1))  +  0.5 · [t ∈ chunk]
//!        t ∈ query, |t| ≥ 3
//! ```
//!
//! where `tf` is the term's share of the chunk's tokens, `N` is the number of
//! candidate chunks and `df` counts candidates whose content contains the term
//! as a case-insensitive substring. IDF turns negative for terms present in
//! every candidate; the exact-match bonus keeps such hits ranked above misses.
//! Ranking order depends on this exact formula, so it must not drift toward
//! textbook TF-IDF.

use std::collections::HashSet;

use crate::document::Chunk;

/// Query terms shorter than this many characters are ignored.
pub const MIN_TERM_CHARS: usize = 3;

/// Flat bonus for a query term that appears verbatim among the chunk's tokens.
pub const EXACT_MATCH_BONUS: f64 = 0.5;

/// Lower-case `text` and split it on whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Score how relevant `chunk_text` is to `query` among `all_chunks`.
///
/// Deterministic for identical inputs. A chunk sharing no query term of at
/// least [`MIN_TERM_CHARS`] characters scores exactly `0.0`.
pub fn score(query: &str, chunk_text: &str, all_chunks: &[Chunk]) -> f64 {
    let lowered: Vec<String> = all_chunks.iter().map(|c| c.content.to_lowercase()).collect();
    score_lowered(query, chunk_text, &lowered)
}

/// [`score`] against candidate contents that are already lower-cased.
///
/// The retriever lower-cases every candidate once per query and reuses the
/// result for each pairwise score.
pub(crate) fn score_lowered(query: &str, chunk_text: &str, lowered_chunks: &[String]) -> f64 {
    let chunk_tokens = tokenize(chunk_text);
    let token_set: HashSet<&str> = chunk_tokens.iter().map(String::as_str).collect();
    let total_chunks = lowered_chunks.len();

    let mut total = 0.0;
    for term in tokenize(query) {
        if term.chars().count() < MIN_TERM_CHARS {
            continue;
        }

        let occurrences = chunk_tokens.iter().filter(|t| **t == term).count();
        let tf = if chunk_tokens.is_empty() {
            0.0
        } else {
            occurrences as f64 / chunk_tokens.len() as f64
        };

        let idf = if total_chunks == 0 {
            0.0
        } else {
            let df = lowered_chunks.iter().filter(|c| c.contains(term.as_str())).count();
            (total_chunks as f64 / (df + 1) as f64).ln()
        };

        total += tf * idf;

        if token_set.contains(term.as_str()) {
            total += EXACT_MATCH_BONUS;
        }
    }

    total
}
