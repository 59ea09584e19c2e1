//! Configuration for chunking and the knowledge base.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Default number of words per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Default number of words carried into the next chunk.
pub const DEFAULT_OVERLAP: usize = 50;

/// Default number of chunks returned by a query.
pub const DEFAULT_TOP_K: usize = 3;

/// Default per-document token budget.
pub const DEFAULT_MAX_DOCUMENT_TOKENS: usize = 100_000;

/// Options controlling how text is split into chunks.
///
/// Sizes are measured in whitespace-separated words.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ChunkingOptions {
    /// Word budget per chunk.
    pub chunk_size: usize,
    /// Words of the previous chunk repeated at the start of the next one.
    pub overlap: usize,
    /// Split on paragraph boundaries instead of a fixed word window.
    pub preserve_paragraphs: bool,
}

impl Default for ChunkingOptions {
    fn default() -> Self {
        Self { chunk_size: DEFAULT_CHUNK_SIZE, overlap: DEFAULT_OVERLAP, preserve_paragraphs: true }
    }
}

impl ChunkingOptions {
    /// Create a new builder for constructing [`ChunkingOptions`].
    pub fn builder() -> ChunkingOptionsBuilder {
        ChunkingOptionsBuilder::default()
    }

    /// Check that the options describe a terminating split.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ChunkingError`] if `chunk_size == 0` or
    /// `overlap >= chunk_size`.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(RagError::ChunkingError("chunk_size must be greater than zero".to_string()));
        }
        if self.overlap >= self.chunk_size {
            return Err(RagError::ChunkingError(format!(
                "overlap ({}) must be less than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    /// Number of words a sliding window advances per step.
    pub(crate) fn step(&self) -> usize {
        self.chunk_size - self.overlap
    }
}

/// Builder for constructing validated [`ChunkingOptions`].
#[derive(Debug, Clone, Default)]
pub struct ChunkingOptionsBuilder {
    options: ChunkingOptions,
}

impl ChunkingOptionsBuilder {
    /// Set the word budget per chunk.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.options.chunk_size = size;
        self
    }

    /// Set the number of overlapping words between consecutive chunks.
    pub fn overlap(mut self, overlap: usize) -> Self {
        self.options.overlap = overlap;
        self
    }

    /// Choose paragraph-aligned (`true`) or sliding-window (`false`) chunking.
    pub fn preserve_paragraphs(mut self, preserve: bool) -> Self {
        self.options.preserve_paragraphs = preserve;
        self
    }

    /// Build the [`ChunkingOptions`], validating them.
    ///
    /// # Errors
    ///
    /// See [`ChunkingOptions::validate`].
    pub fn build(self) -> Result<ChunkingOptions> {
        self.options.validate()?;
        Ok(self.options)
    }
}

/// Configuration for a [`KnowledgeBase`](crate::KnowledgeBase).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RagConfig {
    /// How documents are chunked on insert.
    pub chunking: ChunkingOptions,
    /// Number of top results to return from a query.
    pub top_k: usize,
    /// Documents whose estimated token count exceeds this are rejected.
    pub max_document_tokens: usize,
    /// Answer with the no-context sentinel instead of calling the generator
    /// when retrieval finds nothing.
    pub strict_grounding: bool,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunking: ChunkingOptions::default(),
            top_k: DEFAULT_TOP_K,
            max_document_tokens: DEFAULT_MAX_DOCUMENT_TOKENS,
            strict_grounding: true,
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the chunking options.
    pub fn chunking(mut self, options: ChunkingOptions) -> Self {
        self.config.chunking = options;
        self
    }

    /// Set the word budget per chunk.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunking.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in words.
    pub fn overlap(mut self, overlap: usize) -> Self {
        self.config.chunking.overlap = overlap;
        self
    }

    /// Choose paragraph-aligned or sliding-window chunking.
    pub fn preserve_paragraphs(mut self, preserve: bool) -> Self {
        self.config.chunking.preserve_paragraphs = preserve;
        self
    }

    /// Set the number of top results to return.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the per-document token budget.
    pub fn max_document_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_document_tokens = max_tokens;
        self
    }

    /// Enable or disable the no-context short circuit in
    /// [`KnowledgeBase::ask`](crate::KnowledgeBase::ask).
    pub fn strict_grounding(mut self, strict: bool) -> Self {
        self.config.strict_grounding = strict;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - the chunking options are invalid
    /// - `top_k == 0`
    /// - `max_document_tokens == 0`
    pub fn build(self) -> Result<RagConfig> {
        self.config.chunking.validate().map_err(|e| RagError::ConfigError(e.to_string()))?;
        if self.config.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        if self.config.max_document_tokens == 0 {
            return Err(RagError::ConfigError(
                "max_document_tokens must be greater than zero".to_string(),
            ));
        }
        Ok(self.config)
    }
}
