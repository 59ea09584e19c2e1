//! Knowledge base facade.
//!
//! The [`KnowledgeBase`] owns the documents a chat session can ground answers
//! in. It chunks documents as they are added, ranks their chunks for a query
//! with [`retrieve`], and optionally passes the grounded prompt to a
//! [`Generator`].
//!
//! # Example
//!
//! ```rust,ignore
//! use aivue_rag::{KnowledgeBase, RagConfig};
//!
//! let kb = KnowledgeBase::builder()
//!     .config(RagConfig::default())
//!     .generator(Arc::new(my_generator))
//!     .build()?;
//!
//! kb.add_text("FAQ", "Returns are accepted within 30 days.").await?;
//! let answer = kb.ask("How long do I have to return an item?").await?;
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::chunking::Chunker;
use crate::config::RagConfig;
use crate::context::{NO_CONTEXT_ANSWER, build_prompt};
use crate::document::{Document, RetrievalResult, SourceKind};
use crate::error::{RagError, Result};
use crate::extract::{estimate_token_count, generate_document_id, read_text_file};
use crate::generator::Generator;
use crate::retrieval::retrieve;

/// An answer to a question together with the passages it was grounded in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Answer {
    /// The generated (or sentinel) answer text.
    pub text: String,
    /// The retrieval the prompt was built from.
    pub retrieval: RetrievalResult,
}

impl Answer {
    /// Return `true` if the answer was built from at least one passage that
    /// shares a term with the question.
    pub fn is_grounded(&self) -> bool {
        self.retrieval.has_matches()
    }
}

/// An in-memory collection of chunked documents.
///
/// Documents are held behind a `tokio::sync::RwLock`, so a knowledge base can
/// be shared across tasks behind an `Arc`. Construct one via
/// [`KnowledgeBase::builder()`].
pub struct KnowledgeBase {
    config: RagConfig,
    chunker: Arc<dyn Chunker>,
    generator: Option<Arc<dyn Generator>>,
    documents: RwLock<Vec<Document>>,
    #[cfg(feature = "fetch")]
    http: reqwest::Client,
}

impl KnowledgeBase {
    /// Create a new [`KnowledgeBaseBuilder`].
    pub fn builder() -> KnowledgeBaseBuilder {
        KnowledgeBaseBuilder::default()
    }

    /// Return a reference to the configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Add pasted or typed text as a [`SourceKind::Text`] document.
    ///
    /// # Errors
    ///
    /// See [`add_document`](Self::add_document).
    pub async fn add_text(
        &self,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Document> {
        self.add_document(name, SourceKind::Text, None, content).await
    }

    /// Chunk and store a document, returning the stored copy.
    ///
    /// The document gets a freshly generated ID.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DocumentTooLargeError`] if the content's estimated token
    /// count exceeds `max_document_tokens`, or the chunker's error.
    pub async fn add_document(
        &self,
        name: impl Into<String>,
        kind: SourceKind,
        url: Option<String>,
        content: impl Into<String>,
    ) -> Result<Document> {
        let content = content.into();
        self.check_size(&content)?;

        let mut document = Document::new(generate_document_id(), name, kind, content);
        document.url = url;
        document.chunks = self.chunker.chunk(&document)?;

        info!(
            document.id = %document.id,
            document.kind = %document.kind,
            chunk_count = document.chunks.len(),
            "added document"
        );

        self.documents.write().await.push(document.clone());
        Ok(document)
    }

    /// Read a UTF-8 text file and add it, named after the file.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IoError`] if the file cannot be read, plus the errors of
    /// [`add_document`](Self::add_document).
    pub async fn add_file(&self, path: impl AsRef<Path>) -> Result<Document> {
        let path = path.as_ref();
        let content = read_text_file(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.add_document(name, SourceKind::Text, None, content).await
    }

    /// Download a web page and add its text as a [`SourceKind::Url`] document.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::FetchError`] if the page cannot be downloaded or holds no
    /// text, plus the errors of [`add_document`](Self::add_document).
    #[cfg(feature = "fetch")]
    pub async fn add_url(&self, url: &str) -> Result<Document> {
        let content = crate::fetch::fetch_url_content(&self.http, url).await?;
        self.add_document(url, SourceKind::Url, Some(url.to_string()), content).await
    }

    /// Replace a stored document's content and re-chunk it.
    ///
    /// The ID, name, kind and creation time are kept.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DocumentNotFoundError`] if no document has `id`, plus the
    /// size and chunking errors of [`add_document`](Self::add_document).
    pub async fn replace_content(&self, id: &str, content: impl Into<String>) -> Result<Document> {
        let content = content.into();
        self.check_size(&content)?;

        let mut documents = self.documents.write().await;
        let document = documents
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| RagError::DocumentNotFoundError(id.to_string()))?;

        let mut replacement = document.clone();
        replacement.content = content;
        replacement.chunks = self.chunker.chunk(&replacement)?;
        *document = replacement;

        info!(document.id = id, chunk_count = document.chunks.len(), "replaced document content");
        Ok(document.clone())
    }

    /// Remove a document. Returns `false` if no document had `id`.
    pub async fn remove_document(&self, id: &str) -> bool {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|d| d.id != id);
        let removed = documents.len() != before;
        if removed {
            info!(document.id = id, "removed document");
        }
        removed
    }

    /// Remove every document.
    pub async fn clear(&self) {
        self.documents.write().await.clear();
    }

    /// Return a copy of the stored document with `id`.
    pub async fn get(&self, id: &str) -> Option<Document> {
        self.documents.read().await.iter().find(|d| d.id == id).cloned()
    }

    /// Return a copy of all stored documents in insertion order.
    pub async fn documents(&self) -> Vec<Document> {
        self.documents.read().await.clone()
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Return `true` if no documents are stored.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    /// Retrieve the configured `top_k` chunks for `query`.
    pub async fn retrieve(&self, query: &str) -> RetrievalResult {
        self.retrieve_top_k(query, self.config.top_k).await
    }

    /// Retrieve at most `top_k` chunks for `query`.
    pub async fn retrieve_top_k(&self, query: &str, top_k: usize) -> RetrievalResult {
        let documents = self.documents.read().await;
        let result = retrieve(query, &documents, top_k);
        info!(result_count = result.len(), top_k, "query completed");
        result
    }

    /// Answer `question` from the stored documents.
    ///
    /// With `strict_grounding` enabled and no stored chunk sharing a term with
    /// the question, the answer is [`NO_CONTEXT_ANSWER`] and the generator is
    /// not called. Otherwise the
    /// generator receives [`build_prompt`] of the retrieval and the question.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if no generator was configured, or the
    /// generator's error.
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        let generator = self.generator.as_ref().ok_or_else(|| {
            RagError::ConfigError("a generator is required to answer questions".to_string())
        })?;

        let retrieval = self.retrieve(question).await;
        if self.config.strict_grounding && !retrieval.has_matches() {
            warn!(
                candidates = retrieval.len(),
                "no matching passages, answering with the no-context reply"
            );
            return Ok(Answer { text: NO_CONTEXT_ANSWER.to_string(), retrieval });
        }

        let prompt = build_prompt(&retrieval, question);
        let text = generator.generate(&prompt).await.map_err(|e| {
            error!(generator = generator.name(), error = %e, "generation failed");
            e
        })?;

        info!(generator = generator.name(), source_count = retrieval.len(), "answered question");
        Ok(Answer { text, retrieval })
    }

    fn check_size(&self, content: &str) -> Result<()> {
        let tokens = estimate_token_count(content);
        let max_tokens = self.config.max_document_tokens;
        if tokens > max_tokens {
            warn!(tokens, max_tokens, "rejected oversized document");
            return Err(RagError::DocumentTooLargeError { tokens, max_tokens });
        }
        Ok(())
    }
}

/// Builder for constructing a [`KnowledgeBase`].
///
/// Every field is optional: the configuration defaults to
/// [`RagConfig::default()`], the chunker to the configuration's chunking
/// options, and without a generator only [`KnowledgeBase::ask`] is unavailable.
///
/// # Example
///
/// ```rust,ignore
/// let kb = KnowledgeBase::builder()
///     .config(RagConfig::builder().top_k(5).build()?)
///     .chunker(Arc::new(SlidingWindowChunker::new(200, 20)?))  // optional
///     .generator(Arc::new(generator))                          // optional
///     .build()?;
/// ```
#[derive(Default)]
pub struct KnowledgeBaseBuilder {
    config: Option<RagConfig>,
    chunker: Option<Arc<dyn Chunker>>,
    generator: Option<Arc<dyn Generator>>,
    #[cfg(feature = "fetch")]
    http: Option<reqwest::Client>,
}

impl KnowledgeBaseBuilder {
    /// Set the configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a chunking strategy other than the configuration's options.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the generator used by [`KnowledgeBase::ask`].
    pub fn generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Set the HTTP client used by [`KnowledgeBase::add_url`].
    #[cfg(feature = "fetch")]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Build the [`KnowledgeBase`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if the configuration is invalid.
    pub fn build(self) -> Result<KnowledgeBase> {
        let config = self.config.unwrap_or_default();
        config.chunking.validate().map_err(|e| RagError::ConfigError(e.to_string()))?;
        if config.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }

        let chunker = self.chunker.unwrap_or_else(|| Arc::new(config.chunking) as Arc<dyn Chunker>);

        Ok(KnowledgeBase {
            config,
            chunker,
            generator: self.generator,
            documents: RwLock::new(Vec::new()),
            #[cfg(feature = "fetch")]
            http: self.http.unwrap_or_default(),
        })
    }
}
