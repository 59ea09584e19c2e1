//! # aivue-rag
//!
//! Keyword-ranked Retrieval-Augmented Generation for the AIVue chatbot.
//!
//! Documents are split into word-budgeted, overlapping chunks; at query time
//! every chunk is scored against the query with a TF-IDF-like heuristic, the
//! best `top_k` are kept, and they are rendered into a labelled context block
//! that instructs a language model to answer only from it.
//!
//! ## Core functions
//!
//! | Step | Function |
//! |------|----------|
//! | Chunk | [`chunk_text`] |
//! | Score | [`score`] |
//! | Rank | [`retrieve`] |
//! | Render | [`build_context`], [`build_prompt_prefix`], [`build_prompt`] |
//!
//! These are pure functions over their arguments. [`KnowledgeBase`] wraps them
//! with document storage and an optional [`Generator`].
//!
//! ## Feature Flags
//!
//! | Feature | Enables |
//! |---------|---------|
//! | `openai` | [`openai::OpenAIGenerator`] (chat completions via `reqwest`) |
//! | `fetch` | [`fetch::fetch_url_content`] and [`KnowledgeBase::add_url`] |
//! | `full` | everything above |
//!
//! ## Example
//!
//! ```rust,ignore
//! use aivue_rag::{chunk_text, retrieve, ChunkingOptions, Document, SourceKind};
//!
//! let text = "Returns are accepted within 30 days.\n\nShipping is free over $50.";
//! let chunks = chunk_text(text, "faq", "FAQ", &ChunkingOptions::default())?;
//! let doc = Document::new("faq", "FAQ", SourceKind::Text, text).with_chunks(chunks);
//!
//! let result = retrieve("returns policy", &[doc], 3);
//! println!("{}", result.context);
//! ```

pub mod chunking;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod extract;
pub mod generator;
pub mod knowledge;
pub mod retrieval;
pub mod scoring;

#[cfg(feature = "fetch")]
pub mod fetch;
#[cfg(feature = "openai")]
pub mod openai;

pub use chunking::{
    Chunker, ParagraphChunker, SlidingWindowChunker, chunk_text, normalize_whitespace,
};
pub use config::{ChunkingOptions, ChunkingOptionsBuilder, RagConfig, RagConfigBuilder};
pub use context::{NO_CONTEXT_ANSWER, build_context, build_prompt, build_prompt_prefix};
pub use document::{Chunk, Document, RetrievalResult, SourceKind};
pub use error::{RagError, Result};
pub use extract::{
    estimate_token_count, generate_document_id, html_to_text, read_text_file,
    validate_document_size,
};
pub use generator::Generator;
pub use knowledge::{Answer, KnowledgeBase, KnowledgeBaseBuilder};
pub use retrieval::retrieve;
pub use scoring::{score, tokenize};
