//! recap - Summarize WebVTT meeting transcripts with an LLM
//!
//! Transcripts are split into token-bounded chunks before being handed to the
//! configured language model, either over HTTP (`recap serve`) or from the CLI.

pub mod cli;
pub mod config;
pub mod llm;
pub mod server;
pub mod service;
pub mod transcript;

use thiserror::Error;

/// Main error type for recap
#[derive(Error, Debug)]
pub enum RecapError {
    #[error("Invalid transcript: {0}")]
    Transcript(#[from] transcript::VttError),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Summarization failed: {0}")]
    Llm(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, RecapError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
