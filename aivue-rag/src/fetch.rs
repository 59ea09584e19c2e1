//! Web page download for URL documents.
//!
//! This module is only available when the `fetch` feature is enabled.

use reqwest::header::ACCEPT;
use tracing::{debug, error};

use crate::error::{RagError, Result};
use crate::extract::html_to_text;

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Download `url` and return its readable text.
///
/// # Errors
///
/// Returns [`RagError::FetchError`] if the request fails, the server answers with a
/// non-success status, or the page contains no extractable text.
pub async fn fetch_url_content(client: &reqwest::Client, url: &str) -> Result<String> {
    let fetch_error = |message: String| RagError::FetchError { url: url.to_string(), message };

    let response = client.get(url).header(ACCEPT, HTML_ACCEPT).send().await.map_err(|e| {
        error!(url, error = %e, "request failed");
        fetch_error(format!("request failed: {e}"))
    })?;

    let status = response.status();
    if !status.is_success() {
        error!(url, %status, "unexpected status");
        return Err(fetch_error(format!("HTTP error! status: {}", status.as_u16())));
    }

    let html = response.text().await.map_err(|e| {
        error!(url, error = %e, "failed to read body");
        fetch_error(format!("failed to read body: {e}"))
    })?;

    let text = html_to_text(&html);
    if text.trim().is_empty() {
        return Err(fetch_error("No text content could be extracted from the URL".to_string()));
    }

    debug!(url, html_len = html.len(), text_len = text.len(), "fetched page");
    Ok(text)
}
