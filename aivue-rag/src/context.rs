//! Prompt context assembly from retrieval results.

use crate::document::RetrievalResult;

/// The answer a model is told to give when the context cannot ground it.
pub const NO_CONTEXT_ANSWER: &str = "I can only answer from the context of knowledge base data.";

/// Render the selected chunks as labelled passages, in ranked order.
///
/// Each chunk becomes `"[From {document_name}]:\n{content}"`; passages are
/// separated by a blank line. An empty result renders as `""`, which callers
/// must treat as "no grounding available".
pub fn build_context(result: &RetrievalResult) -> String {
    result
        .chunks
        .iter()
        .map(|chunk| format!("[From {}]:\n{}", chunk.document_name, chunk.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Wrap the context in an instruction restricting the model to it.
///
/// Returns `""` when `result` holds no chunks.
pub fn build_prompt_prefix(result: &RetrievalResult) -> String {
    if result.chunks.is_empty() {
        return String::new();
    }

    format!(
        "Context from knowledge base:\n\n{}\n\nIMPORTANT: You must ONLY answer questions based on \
         the context provided above. If the context does not contain information to answer the \
         question, respond with: \"{NO_CONTEXT_ANSWER}\"",
        build_context(result)
    )
}

/// Combine the grounding prefix with the user's question.
///
/// Without grounding the question is passed through unchanged.
pub fn build_prompt(result: &RetrievalResult, question: &str) -> String {
    let prefix = build_prompt_prefix(result);
    if prefix.is_empty() {
        return question.to_string();
    }
    format!("{prefix}\n\nQuestion: {question}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Chunk;

    fn result(chunks: Vec<Chunk>) -> RetrievalResult {
        let scores = vec![1.0; chunks.len()];
        let mut result = RetrievalResult { chunks, scores, context: String::new() };
        result.context = build_context(&result);
        result
    }

    #[test]
    fn single_chunk_context() {
        let r = result(vec![Chunk::new("d", "Doc", "Hello", 0)]);
        assert_eq!(build_context(&r), "[From Doc]:\nHello");
    }

    #[test]
    fn chunks_are_separated_by_a_blank_line_in_given_order() {
        let r = result(vec![
            Chunk::new("b", "Second", "later", 3),
            Chunk::new("a", "First", "earlier", 0),
        ]);
        assert_eq!(build_context(&r), "[From Second]:\nlater\n\n[From First]:\nearlier");
    }

    #[test]
    fn empty_result_builds_nothing() {
        let r = RetrievalResult::default();
        assert_eq!(build_context(&r), "");
        assert_eq!(build_prompt_prefix(&r), "");
        assert_eq!(build_prompt(&r, "why?"), "why?");
    }

    #[test]
    fn prefix_wraps_context_with_grounding_instruction() {
        let r = result(vec![Chunk::new("d", "Doc", "Hello", 0)]);
        let prefix = build_prompt_prefix(&r);
        assert!(
            prefix.starts_with("Context from knowledge base:\n\n[From Doc]:\nHello\n\nIMPORTANT:")
        );
        assert!(prefix.ends_with(&format!("\"{NO_CONTEXT_ANSWER}\"")));
    }

    #[test]
    fn prompt_appends_question() {
        let r = result(vec![Chunk::new("d", "Doc", "Hello", 0)]);
        assert!(build_prompt(&r, "Who greets?").ends_with("\n\nQuestion: Who greets?"));
    }
}
