//! Integration tests for the knowledge base facade.

use std::sync::{Arc, Mutex};

use aivue_rag::{
    Generator, KnowledgeBase, NO_CONTEXT_ANSWER, RagConfig, RagError, SlidingWindowChunker,
    SourceKind,
};
use async_trait::async_trait;

/// Records every prompt and answers with a fixed reply.
#[derive(Default)]
struct RecordingGenerator {
    prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> aivue_rag::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok("Returns are accepted within 30 days.".to_string())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> aivue_rag::Result<String> {
        Err(RagError::GenerationError { provider: "failing".into(), message: "boom".into() })
    }
}

fn knowledge_base(generator: Arc<dyn Generator>) -> KnowledgeBase {
    KnowledgeBase::builder()
        .config(RagConfig::builder().chunk_size(20).overlap(5).top_k(2).build().unwrap())
        .generator(generator)
        .build()
        .unwrap()
}

#[tokio::test]
async fn added_documents_are_chunked_and_stored() {
    let kb = KnowledgeBase::builder().build().unwrap();
    assert!(kb.is_empty().await);

    let doc = kb.add_text("FAQ", "Returns are accepted within thirty days.").await.unwrap();
    assert!(doc.id.starts_with("doc-"));
    assert_eq!(doc.kind, SourceKind::Text);
    assert_eq!(doc.chunks.len(), 1);
    assert_eq!(doc.chunks[0].id, format!("{}-chunk-0", doc.id));
    assert_eq!(doc.chunks[0].document_name, "FAQ");

    assert_eq!(kb.len().await, 1);
    assert_eq!(kb.get(&doc.id).await, Some(doc.clone()));
    assert_eq!(kb.documents().await, vec![doc]);
}

#[tokio::test]
async fn retrieval_spans_documents_and_respects_top_k() {
    let kb = knowledge_base(Arc::new(RecordingGenerator::default()));
    kb.add_text("Returns", "Returns are accepted within thirty days of delivery.").await.unwrap();
    kb.add_text("Shipping", "Shipping is free for orders above fifty dollars.").await.unwrap();
    kb.add_text("Contact", "Email support for any other questions.").await.unwrap();

    let result = kb.retrieve("shipping orders").await;
    assert_eq!(result.len(), 2);
    assert_eq!(result.chunks[0].document_name, "Shipping");

    let single = kb.retrieve_top_k("shipping orders", 1).await;
    assert_eq!(single.len(), 1);
}

#[tokio::test]
async fn ask_sends_grounded_prompt_to_generator() {
    let generator = Arc::new(RecordingGenerator::default());
    let kb = knowledge_base(generator.clone());
    kb.add_text("Returns", "Returns are accepted within thirty days of delivery.").await.unwrap();

    let answer = kb.ask("When are returns accepted?").await.unwrap();
    assert!(answer.is_grounded());
    assert_eq!(answer.text, "Returns are accepted within 30 days.");

    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].starts_with("Context from knowledge base:\n\n[From Returns]:\n"));
    assert!(prompts[0].contains(NO_CONTEXT_ANSWER));
    assert!(prompts[0].ends_with("Question: When are returns accepted?"));
}

#[tokio::test]
async fn strict_mode_answers_without_generator_when_nothing_is_stored() {
    let generator = Arc::new(RecordingGenerator::default());
    let kb = knowledge_base(generator.clone());

    let answer = kb.ask("Anything?").await.unwrap();
    assert_eq!(answer.text, NO_CONTEXT_ANSWER);
    assert!(!answer.is_grounded());
    assert!(generator.prompts().is_empty());
}

#[tokio::test]
async fn strict_mode_answers_without_generator_when_nothing_matches() {
    let generator = Arc::new(RecordingGenerator::default());
    let kb = knowledge_base(generator.clone());
    kb.add_text("Returns", "Returns are accepted within thirty days.").await.unwrap();

    let answer = kb.ask("zebra giraffe quantum").await.unwrap();
    assert_eq!(answer.text, NO_CONTEXT_ANSWER);
    assert!(!answer.is_grounded());
    assert_eq!(answer.retrieval.scores, vec![0.0]);
    assert!(generator.prompts().is_empty());
}

#[tokio::test]
async fn negative_scoring_match_still_reaches_generator() {
    let generator = Arc::new(RecordingGenerator::default());
    let kb = knowledge_base(generator.clone());
    kb.add_text("Greeting", "hello").await.unwrap();

    // One chunk containing the only term: TF 1, IDF ln(1/2), plus the bonus.
    let answer = kb.ask("hello").await.unwrap();
    assert!(answer.retrieval.scores[0] < 0.0);
    assert!(answer.is_grounded());
    assert_eq!(generator.prompts().len(), 1);
}

#[tokio::test]
async fn lenient_mode_forwards_bare_question() {
    let generator = Arc::new(RecordingGenerator::default());
    let kb = KnowledgeBase::builder()
        .config(RagConfig::builder().strict_grounding(false).build().unwrap())
        .generator(generator.clone())
        .build()
        .unwrap();

    kb.ask("Anything?").await.unwrap();
    assert_eq!(generator.prompts(), vec!["Anything?".to_string()]);
}

#[tokio::test]
async fn ask_without_generator_is_a_config_error() {
    let kb = KnowledgeBase::builder().build().unwrap();
    assert!(matches!(kb.ask("hello").await, Err(RagError::ConfigError(_))));
}

#[tokio::test]
async fn generator_errors_propagate() {
    let kb = knowledge_base(Arc::new(FailingGenerator));
    kb.add_text("Doc", "Some stored words here.").await.unwrap();
    assert!(matches!(kb.ask("stored words").await, Err(RagError::GenerationError { .. })));
}

#[tokio::test]
async fn oversized_documents_are_rejected() {
    let kb = KnowledgeBase::builder()
        .config(RagConfig::builder().max_document_tokens(2).build().unwrap())
        .build()
        .unwrap();

    let err = kb.add_text("Big", "more than eight characters").await.unwrap_err();
    assert!(matches!(err, RagError::DocumentTooLargeError { max_tokens: 2, .. }));
    assert!(kb.is_empty().await);
}

#[tokio::test]
async fn replace_and_remove_documents() {
    let kb = KnowledgeBase::builder()
        .chunker(Arc::new(SlidingWindowChunker::new(2, 0).unwrap()))
        .build()
        .unwrap();
    let doc = kb.add_text("Notes", "one two three").await.unwrap();
    assert_eq!(doc.chunks.len(), 2);

    let replaced = kb.replace_content(&doc.id, "alpha beta gamma delta epsilon").await.unwrap();
    assert_eq!(replaced.id, doc.id);
    assert_eq!(replaced.created_at, doc.created_at);
    assert_eq!(replaced.chunks.len(), 3);

    let missing = kb.replace_content("doc-missing", "text").await.unwrap_err();
    assert!(matches!(missing, RagError::DocumentNotFoundError(id) if id == "doc-missing"));

    assert!(kb.remove_document(&doc.id).await);
    assert!(!kb.remove_document(&doc.id).await);
    assert!(kb.is_empty().await);
}

#[tokio::test]
async fn clear_drops_everything() {
    let kb = KnowledgeBase::builder().build().unwrap();
    kb.add_text("A", "first").await.unwrap();
    kb.add_text("B", "second").await.unwrap();
    kb.clear().await;
    assert!(kb.is_empty().await);
    assert!(kb.retrieve("first").await.is_empty());
}

#[tokio::test]
async fn files_are_named_after_their_file_name() {
    let path = std::env::temp_dir().join(format!("aivue-rag-{}.txt", std::process::id()));
    tokio::fs::write(&path, "Stored in a file.\n\nSecond paragraph.").await.unwrap();

    let kb = KnowledgeBase::builder().build().unwrap();
    let doc = kb.add_file(&path).await.unwrap();
    tokio::fs::remove_file(&path).await.unwrap();

    assert_eq!(doc.name, path.file_name().unwrap().to_string_lossy());
    assert_eq!(doc.content, "Stored in a file.\n\nSecond paragraph.");
    assert_eq!(doc.chunks.len(), 1);
}

#[test]
fn invalid_config_is_rejected_by_builder() {
    let config = RagConfig { top_k: 0, ..RagConfig::default() };
    let result = KnowledgeBase::builder().config(config).build();
    assert!(matches!(result, Err(RagError::ConfigError(_))));
}
