//! Text generation trait for answering grounded prompts.

use async_trait::async_trait;

use crate::error::Result;

/// A backend that turns a prompt into a model response.
///
/// The knowledge base hands it the prompt produced by
/// [`build_prompt`](crate::build_prompt). Implementations wrap a specific
/// provider (OpenAI, a local model, a test double) behind this interface.
///
/// # Example
///
/// ```rust,ignore
/// use aivue_rag::Generator;
///
/// let generator = MyGenerator::new();
/// let answer = generator.generate("Context from knowledge base: ...").await?;
/// ```
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a response for a single prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Short provider name used in logs.
    fn name(&self) -> &str {
        "generator"
    }
}
