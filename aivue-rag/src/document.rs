//! Data types for documents, chunks, and retrieval results.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where a [`Document`]'s text came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Text extracted from a PDF upload.
    Pdf,
    /// Text scraped from a web page.
    Url,
    /// Plain text pasted or read from a text file.
    Text,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Pdf => "pdf",
            Self::Url => "url",
            Self::Text => "text",
        };
        f.write_str(kind)
    }
}

/// A source document and the chunks derived from its content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique identifier for the document.
    pub id: String,
    /// Human-readable name shown in provenance labels.
    pub name: String,
    /// The kind of source the content was extracted from.
    #[serde(rename = "type")]
    pub kind: SourceKind,
    /// Original location for [`SourceKind::Url`] documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// The raw text content of the document.
    pub content: String,
    /// Chunks of `content`, ordered by [`Chunk::index`].
    pub chunks: Vec<Chunk>,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
    /// Free-form metadata supplied by the caller.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

impl Document {
    /// Create an unchunked document stamped with the current time.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: SourceKind,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            url: None,
            content: content.into(),
            chunks: Vec::new(),
            created_at: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    /// Set the source URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Replace the chunk list.
    pub fn with_chunks(mut self, chunks: Vec<Chunk>) -> Self {
        self.chunks = chunks;
        self
    }
}

/// A passage of a [`Document`] used as the unit of retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    /// Identifier of the form `{document_id}-chunk-{index}`.
    pub id: String,
    /// The ID of the parent [`Document`].
    pub document_id: String,
    /// The display name of the parent [`Document`].
    pub document_name: String,
    /// The text content of the chunk.
    pub content: String,
    /// Zero-based position within the parent document.
    pub index: usize,
    /// Free-form metadata attached by a custom [`Chunker`](crate::Chunker).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, Value>>,
}

impl Chunk {
    /// Create a chunk, deriving its ID from the document ID and index.
    pub fn new(
        document_id: &str,
        document_name: &str,
        content: impl Into<String>,
        index: usize,
    ) -> Self {
        Self {
            id: chunk_id(document_id, index),
            document_id: document_id.to_string(),
            document_name: document_name.to_string(),
            content: content.into(),
            index,
            metadata: None,
        }
    }
}

/// Format the stable identifier for the chunk at `index` of `document_id`.
pub fn chunk_id(document_id: &str, index: usize) -> String {
    format!("{document_id}-chunk-{index}")
}

/// The ranked outcome of a retrieval query.
///
/// `chunks` and `scores` are parallel: `scores[i]` is the relevance of
/// `chunks[i]`, highest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RetrievalResult {
    /// Selected chunks, most relevant first.
    pub chunks: Vec<Chunk>,
    /// Relevance score of each selected chunk.
    pub scores: Vec<f64>,
    /// The selected chunks rendered with provenance labels.
    pub context: String,
}

impl RetrievalResult {
    /// Return `true` if no chunk was selected.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Number of selected chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Return `true` if any selected chunk shares a term with the query.
    ///
    /// A chunk scores exactly `0.0` only when none of the query's terms occur
    /// in it. Matching chunks can score below zero when the term is common to
    /// every chunk, so only a nonzero score counts as a match.
    pub fn has_matches(&self) -> bool {
        self.scores.iter().any(|score| *score != 0.0)
    }

    /// Iterate over `(chunk, score)` pairs in ranked order.
    pub fn iter(&self) -> impl Iterator<Item = (&Chunk, f64)> {
        self.chunks.iter().zip(self.scores.iter().copied())
    }
}
