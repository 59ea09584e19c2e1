//! # RAG Chat Example
//!
//! Fetches a web page, adds it to a knowledge base, and answers a question
//! about it with the OpenAI chat completions API.
//!
//! Requires `OPENAI_API_KEY`.
//!
//! Run: `cargo run -p aivue-rag --example rag_chat --features openai,fetch -- <url> "<question>"`

use std::sync::Arc;

use aivue_rag::openai::OpenAIGenerator;
use aivue_rag::{KnowledgeBase, RagConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let mut args = std::env::args().skip(1);
    let url = args.next().unwrap_or_else(|| "https://www.rust-lang.org".to_string());
    let question = args.next().unwrap_or_else(|| "What is Rust good for?".to_string());

    let generator = OpenAIGenerator::from_env()?.with_temperature(0.2);
    let kb = KnowledgeBase::builder()
        .config(RagConfig::builder().chunk_size(200).overlap(20).top_k(3).build()?)
        .generator(Arc::new(generator))
        .build()?;

    let doc = kb.add_url(&url).await?;
    println!("Fetched {} → {} chunk(s)", doc.name, doc.chunks.len());

    let answer = kb.ask(&question).await?;
    println!("\nQ: {question}\nA: {}", answer.text);
    for (chunk, score) in answer.retrieval.iter() {
        println!("  source {} (score {score:.3})", chunk.id);
    }

    Ok(())
}
