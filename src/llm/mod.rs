//! LLM module for recap
//!
//! Model backends behind the `LlmProvider` capability plus the token counters
//! the chunk splitter measures with.

mod client;
mod gemini;
mod ollama;
mod prompts;
mod tokenizer;

pub use client::{build_provider, LlmProvider};
pub use gemini::GeminiClient;
pub use ollama::OllamaClient;
pub use prompts::build_summary_prompt;
pub use tokenizer::{build_token_counter, HfTokenCounter, WhitespaceCounter};
