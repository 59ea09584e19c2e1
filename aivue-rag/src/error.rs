//! Error types for the `aivue-rag` crate.

use thiserror::Error;

/// Errors that can occur in RAG operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// The chunking options cannot produce a valid split.
    #[error("Chunking error: {0}")]
    ChunkingError(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A document exceeds the configured token budget.
    #[error("Document too large: ~{tokens} tokens exceeds the limit of {max_tokens}")]
    DocumentTooLargeError {
        /// Estimated token count of the rejected text.
        tokens: usize,
        /// The configured maximum.
        max_tokens: usize,
    },

    /// No document with the given ID is stored.
    #[error("Document not found: {0}")]
    DocumentNotFoundError(String),

    /// Reading a local file failed.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// The text-generation backend failed.
    #[error("Generation error ({provider}): {message}")]
    GenerationError {
        /// The generation provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// Downloading a web page failed.
    #[error("Failed to fetch URL content from {url}: {message}")]
    FetchError {
        /// The URL that was requested.
        url: String,
        /// A description of the failure.
        message: String,
    },
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
