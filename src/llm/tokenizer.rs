//! Token counters backing the chunk splitter

use anyhow::{anyhow, Result};
use std::path::Path;
use std::sync::Arc;
use tokenizers::Tokenizer;

use crate::config::Settings;
use crate::transcript::TokenCounter;

/// Counts tokens with a Hugging Face `tokenizer.json`.
pub struct HfTokenCounter {
    tokenizer: Tokenizer,
}

impl HfTokenCounter {
    pub fn from_file(path: &Path) -> Result<Self> {
        let tokenizer = Tokenizer::from_file(path)
            .map_err(|e| anyhow!("Failed to load tokenizer {}: {}", path.display(), e))?;

        Ok(Self { tokenizer })
    }
}

impl TokenCounter for HfTokenCounter {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        // Special tokens are counted, matching what the model sees per message.
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow!("Tokenization failed: {}", e))?;

        Ok(encoding.len())
    }
}

/// Rough counter used when no tokenizer file is available: one token per
/// whitespace separated word.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceCounter;

impl TokenCounter for WhitespaceCounter {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        Ok(text.split_whitespace().count())
    }
}

/// Build the token counter configured in settings.
pub fn build_token_counter(settings: &Settings) -> Result<Arc<dyn TokenCounter>> {
    match settings.tokenizer_path() {
        Some(path) => {
            tracing::info!("Loading tokenizer from {}", path.display());
            Ok(Arc::new(HfTokenCounter::from_file(&path)?))
        }
        None => {
            tracing::warn!("No tokenizer configured, approximating tokens by word count");
            Ok(Arc::new(WhitespaceCounter))
        }
    }
}
