//! Document chunking strategies.
//!
//! Text is measured in whitespace-separated words. Two strategies are
//! provided, both selectable through [`ChunkingOptions::preserve_paragraphs`]:
//!
//! - [`ParagraphChunker`] greedily packs whole paragraphs into a chunk and
//!   carries the trailing `overlap` words of each emitted chunk into the next
//! - [`SlidingWindowChunker`] uses a fixed window of `chunk_size` words advancing
//!   by `chunk_size - overlap` words
//!
//! [`chunk_text`] is the entry point used by the knowledge base; the [`Chunker`]
//! trait lets callers plug a strategy into
//! [`KnowledgeBaseBuilder::chunker`](crate::KnowledgeBaseBuilder::chunker).

use tracing::debug;

use crate::config::ChunkingOptions;
use crate::document::{Chunk, Document};
use crate::error::Result;

/// A strategy for splitting documents into chunks.
pub trait Chunker: Send + Sync {
    /// Split a document's content into chunks.
    ///
    /// Returns an empty `Vec` if the content holds no words. Chunk indices
    /// start at 0 and are contiguous.
    fn chunk(&self, document: &Document) -> Result<Vec<Chunk>>;
}

/// Split `text` into chunks belonging to `document_id`.
///
/// Whitespace is normalized first: runs collapse to a single space and the ends
/// are trimmed. Text that is empty after normalization yields no chunks.
///
/// # Errors
///
/// Returns [`RagError::ChunkingError`](crate::RagError::ChunkingError) before doing any
/// work if `options.overlap >= options.chunk_size`.
///
/// # Example
///
/// ```rust,ignore
/// use aivue_rag::{chunk_text, ChunkingOptions};
///
/// let options = ChunkingOptions::builder()
///     .chunk_size(3)
///     .overlap(0)
///     .preserve_paragraphs(false)
///     .build()?;
/// let chunks = chunk_text("Paragraph one. Paragraph two.", "d1", "Doc", &options)?;
/// assert_eq!(chunks.len(), 2);
/// ```
pub fn chunk_text(
    text: &str,
    document_id: &str,
    document_name: &str,
    options: &ChunkingOptions,
) -> Result<Vec<Chunk>> {
    options.validate()?;

    let chunks = if options.preserve_paragraphs {
        pack_paragraphs(text, document_id, document_name, options)
    } else {
        slide_window(text, document_id, document_name, options)
    };

    debug!(
        document.id = document_id,
        chunk_count = chunks.len(),
        chunk_size = options.chunk_size,
        overlap = options.overlap,
        preserve_paragraphs = options.preserve_paragraphs,
        "chunked text"
    );
    Ok(chunks)
}

/// Collapse whitespace runs to single spaces and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split text at blank lines, returning the words of each non-empty paragraph.
fn paragraphs(text: &str) -> Vec<Vec<&str>> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.extend(line.split_whitespace());
        }
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs
}

fn pack_paragraphs(
    text: &str,
    document_id: &str,
    document_name: &str,
    options: &ChunkingOptions,
) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut buffer: Vec<&str> = Vec::new();

    for paragraph in paragraphs(text) {
        if !buffer.is_empty() && buffer.len() + paragraph.len() > options.chunk_size {
            chunks.push(Chunk::new(document_id, document_name, buffer.join(" "), chunks.len()));

            // Keep only the tail that seeds the next chunk.
            let carried_from = buffer.len().saturating_sub(options.overlap);
            buffer.drain(..carried_from);
        }
        buffer.extend(paragraph);
    }

    if !buffer.is_empty() {
        chunks.push(Chunk::new(document_id, document_name, buffer.join(" "), chunks.len()));
    }

    chunks
}

fn slide_window(
    text: &str,
    document_id: &str,
    document_name: &str,
    options: &ChunkingOptions,
) -> Vec<Chunk> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let step = options.step();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < words.len() {
        let end = (start + options.chunk_size).min(words.len());
        let index = start / step;
        chunks.push(Chunk::new(document_id, document_name, words[start..end].join(" "), index));
        start += step;
    }

    chunks
}

impl Chunker for ChunkingOptions {
    fn chunk(&self, document: &Document) -> Result<Vec<Chunk>> {
        chunk_text(&document.content, &document.id, &document.name, self)
    }
}

/// Packs whole paragraphs into chunks of at most `chunk_size` words.
///
/// A paragraph is never split, so a single paragraph longer than `chunk_size`
/// becomes an oversized chunk. When the next paragraph would overflow the
/// current chunk, the chunk is emitted and the next one starts with its last
/// `overlap` words.
///
/// # Example
///
/// ```rust,ignore
/// use aivue_rag::ParagraphChunker;
///
/// let chunker = ParagraphChunker::new(500, 50)?;
/// let chunks = chunker.chunk(&document)?;
/// ```
#[derive(Debug, Clone)]
pub struct ParagraphChunker {
    options: ChunkingOptions,
}

impl ParagraphChunker {
    /// Create a new `ParagraphChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ChunkingError`](crate::RagError::ChunkingError) if
    /// `overlap >= chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        let options = ChunkingOptions::builder()
            .chunk_size(chunk_size)
            .overlap(overlap)
            .preserve_paragraphs(true)
            .build()?;
        Ok(Self { options })
    }
}

impl Chunker for ParagraphChunker {
    fn chunk(&self, document: &Document) -> Result<Vec<Chunk>> {
        self.options.chunk(document)
    }
}

/// Splits text into windows of `chunk_size` words, `overlap` words apart.
///
/// The last window may be shorter than `chunk_size`.
#[derive(Debug, Clone)]
pub struct SlidingWindowChunker {
    options: ChunkingOptions,
}

impl SlidingWindowChunker {
    /// Create a new `SlidingWindowChunker`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ChunkingError`](crate::RagError::ChunkingError) if
    /// `overlap >= chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        let options = ChunkingOptions::builder()
            .chunk_size(chunk_size)
            .overlap(overlap)
            .preserve_paragraphs(false)
            .build()?;
        Ok(Self { options })
    }
}

impl Chunker for SlidingWindowChunker {
    fn chunk(&self, document: &Document) -> Result<Vec<Chunk>> {
        self.options.chunk(document)
    }
}
