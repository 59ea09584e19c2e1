//! Plain-text extraction and document bookkeeping helpers.
//!
//! Everything the chunker consumes must already be decoded plain text. These
//! helpers turn fetched HTML or local text files into that form and apply the
//! size checks the knowledge base enforces before chunking.

use std::path::Path;
use std::sync::LazyLock;

use chrono::Utc;
use regex::{Captures, Regex};
use tracing::{debug, error};
use uuid::Uuid;

use crate::error::Result;

static SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script\s*>")
        .expect("unreachable error: failed to compile script pattern")
});
static STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b.*?</style\s*>")
        .expect("unreachable error: failed to compile style pattern")
});
static HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<head\b.*?</head\s*>")
        .expect("unreachable error: failed to compile head pattern")
});
static COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->").expect("unreachable error: failed to compile comment pattern")
});
static BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)</?(?:div|p|br|h[1-6]|li|tr|section|article|header|footer|nav|aside)\b[^>]*>",
    )
    .expect("unreachable error: failed to compile block tag pattern")
});
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<[^>]+>").expect("unreachable error: failed to compile tag pattern")
});
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#(?:[xX]([0-9a-fA-F]+)|([0-9]+))|([a-zA-Z]+));")
        .expect("unreachable error: failed to compile entity pattern")
});
static EXTRA_BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n\s*\n\s*\n").expect("unreachable error: failed to compile blank line pattern")
});
static INLINE_SPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]+").expect("unreachable error: failed to compile space pattern")
});

/// Convert an HTML page to readable plain text.
///
/// Script, style and head elements and comments are dropped, block-level tags
/// become line breaks, all other tags become spaces, and common named and
/// numeric character references are decoded. Lines are trimmed and runs of
/// blank lines collapse to one, so paragraph breaks survive for the chunker.
pub fn html_to_text(html: &str) -> String {
    let text = SCRIPT.replace_all(html, "");
    let text = STYLE.replace_all(&text, "");
    let text = COMMENT.replace_all(&text, "");
    let text = HEAD.replace_all(&text, "");
    let text = BLOCK_TAG.replace_all(&text, "\n");
    let text = ANY_TAG.replace_all(&text, " ");

    // Single pass, so "&amp;lt;" decodes to the literal "&lt;".
    let text = ENTITY.replace_all(&text, decode_entity);

    let text = INLINE_SPACE.replace_all(&text, " ");
    let text = text.lines().map(str::trim).collect::<Vec<_>>().join("\n");
    let text = EXTRA_BLANK_LINES.replace_all(&text, "\n\n");

    text.trim().to_string()
}

fn decode_entity(caps: &Captures<'_>) -> String {
    let decoded = match (caps.get(1), caps.get(2), caps.get(3)) {
        (Some(hex), _, _) => numeric_entity(u32::from_str_radix(hex.as_str(), 16).ok()),
        (None, Some(dec), _) => numeric_entity(dec.as_str().parse::<u32>().ok()),
        (None, None, Some(name)) => named_entity(name.as_str()).map(str::to_string),
        (None, None, None) => None,
    };
    decoded.unwrap_or_else(|| caps[0].to_string())
}

fn numeric_entity(code: Option<u32>) -> Option<String> {
    code.and_then(char::from_u32).map(String::from)
}

fn named_entity(name: &str) -> Option<&'static str> {
    let decoded = match name {
        "nbsp" => " ",
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "cent" => "¢",
        "pound" => "£",
        "yen" => "¥",
        "euro" => "€",
        "copy" => "©",
        "reg" => "®",
        "trade" => "™",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "hellip" => "…",
        "bull" => "•",
        _ => return None,
    };
    Some(decoded)
}

/// Rough token count, assuming one token per four characters.
pub fn estimate_token_count(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Return `true` if `text` fits within `max_tokens` estimated tokens.
pub fn validate_document_size(text: &str, max_tokens: usize) -> bool {
    estimate_token_count(text) <= max_tokens
}

/// Generate a unique document ID of the form `doc-{unix_millis}-{suffix}`.
pub fn generate_document_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("doc-{}-{}", Utc::now().timestamp_millis(), &suffix[..9])
}

/// Read a UTF-8 text file.
///
/// # Errors
///
/// Returns [`RagError::IoError`](crate::RagError::IoError) if the file cannot be read
/// or is not valid UTF-8.
pub async fn read_text_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        error!(path = %path.display(), error = %e, "failed to read file");
        e
    })?;
    debug!(path = %path.display(), bytes = text.len(), "read text file");
    Ok(text)
}
