//! # RAG Basic Example
//!
//! Demonstrates the keyword RAG flow: add documents, retrieve passages, and
//! answer a question from them.
//!
//! Uses an `EchoGenerator` that returns the first line of retrieved context,
//! so it runs with **zero API keys**.
//!
//! Run: `RUST_LOG=debug cargo run -p aivue-rag --example rag_basic`

use std::sync::Arc;

use aivue_rag::{Generator, KnowledgeBase, RagConfig};
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// EchoGenerator: answers with the first passage it was given
// ---------------------------------------------------------------------------

struct EchoGenerator;

#[async_trait::async_trait]
impl Generator for EchoGenerator {
    async fn generate(&self, prompt: &str) -> aivue_rag::Result<String> {
        // The prompt lists passages as "[From name]:\ncontent"; echo the first body.
        let answer = prompt
            .split("]:\n")
            .nth(1)
            .and_then(|rest| rest.split("\n\n").next())
            .unwrap_or("I don't know.");
        Ok(answer.to_string())
    }

    fn name(&self) -> &str {
        "echo"
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    // -- 1. Configure the knowledge base ----------------------------------
    // Small chunks keep each passage to a paragraph or two; top_k=2 returns
    // the two best passages.
    let config = RagConfig::builder().chunk_size(40).overlap(5).top_k(2).build()?;

    let kb = KnowledgeBase::builder().config(config).generator(Arc::new(EchoGenerator)).build()?;

    // -- 2. Add sample documents ------------------------------------------
    let documents = [
        (
            "Rust Overview",
            "Rust is a systems programming language focused on safety, speed, and \
             concurrency. It achieves memory safety without a garbage collector through \
             its ownership system.\n\n\
             Cargo is the Rust package manager. It downloads dependencies, compiles \
             packages, and runs tests.",
        ),
        (
            "Python Overview",
            "Python is a high-level, interpreted programming language known for its \
             readability and versatility. It is widely used in data science, web \
             development, and automation.",
        ),
        (
            "RAG Primer",
            "Retrieval-Augmented Generation combines a retrieval system with a language \
             model. Documents are chunked, scored against the question, and the most \
             relevant chunks are handed to the model as context.",
        ),
    ];

    println!("Adding {} documents...", documents.len());
    for (name, text) in documents {
        let doc = kb.add_text(name, text).await?;
        println!("  {} ({}) → {} chunk(s)", doc.name, doc.id, doc.chunks.len());
    }

    // -- 3. Retrieve ------------------------------------------------------
    let queries = ["memory safety ownership", "data science language", "package manager tests"];

    for query in &queries {
        println!("\nQuery: \"{query}\"");
        let result = kb.retrieve(query).await;
        for (i, (chunk, score)) in result.iter().enumerate() {
            let preview: String = chunk.content.chars().take(80).collect();
            println!("  {}. [score={score:.4}] {} | {preview}", i + 1, chunk.id);
        }
    }

    // -- 4. Ask -----------------------------------------------------------
    let answer = kb.ask("How does Rust achieve memory safety?").await?;
    println!("\nAnswer ({} source(s)): {}", answer.retrieval.len(), answer.text);

    println!("\nDone.");
    Ok(())
}
