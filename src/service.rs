//! Transcript summarization pipeline
//!
//! Parses a WebVTT transcript, splits it into token-bounded chunks, joins the
//! chunks and asks the model backend for a summary. The backend and the token
//! counter are handed in by the caller so the pipeline runs without a real
//! model in tests.

use std::sync::Arc;
use std::time::Instant;

use crate::llm::{build_summary_prompt, LlmProvider};
use crate::transcript::{join_chunks, split_cues, vtt, TokenCounter};
use crate::{RecapError, Result};

/// Result of summarizing one transcript
#[derive(Debug, Clone)]
pub struct Summary {
    pub text: String,
    pub chunk_count: usize,
    pub elapsed_secs: f64,
}

#[derive(Clone)]
pub struct TranscriptService {
    provider: Arc<dyn LlmProvider>,
    counter: Arc<dyn TokenCounter>,
    token_limit: usize,
}

impl TranscriptService {
    /// Create a service. `token_limit` must be greater than zero.
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        counter: Arc<dyn TokenCounter>,
        token_limit: usize,
    ) -> Self {
        Self {
            provider,
            counter,
            token_limit,
        }
    }

    /// Summarize a WebVTT transcript.
    pub async fn summarize(&self, content: String) -> Result<Summary> {
        let started = Instant::now();

        // Tokenizing a long transcript is CPU bound.
        let counter = Arc::clone(&self.counter);
        let token_limit = self.token_limit;
        let chunks = tokio::task::spawn_blocking(move || {
            split_transcript(&content, counter.as_ref(), token_limit)
        })
        .await
        .map_err(|e| RecapError::Other(format!("Chunking task failed: {}", e)))??;

        tracing::info!(
            "Summarizing {} chunks with {}",
            chunks.len(),
            self.provider.name()
        );

        let prompt = build_summary_prompt(&join_chunks(&chunks));
        let text = self
            .provider
            .generate(&prompt)
            .await
            .map_err(|e| RecapError::Llm(format!("{:#}", e)))?;

        let elapsed_secs = started.elapsed().as_secs_f64();
        tracing::info!("Summary generated in {:.2}s", elapsed_secs);

        Ok(Summary {
            text,
            chunk_count: chunks.len(),
            elapsed_secs,
        })
    }
}

/// Parse WebVTT content and split its cues into chunks.
pub fn split_transcript(
    content: &str,
    counter: &dyn TokenCounter,
    token_limit: usize,
) -> Result<Vec<String>> {
    let cues = vtt::parse(content)?;

    split_cues(&cues, counter, token_limit).map_err(|e| RecapError::Tokenizer(format!("{:#}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result as AnyResult;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::llm::WhitespaceCounter;

    const TRANSCRIPT: &str = "WEBVTT\n\
\n\
1\n\
00:00:00.000 --> 00:00:02.000\n\
one two three\n\
\n\
2\n\
00:00:02.000 --> 00:00:04.000\n\
four five\n\
\n\
3\n\
00:00:04.000 --> 00:00:06.000\n\
six seven eight\n";

    /// Records the prompt it receives and answers with a canned summary.
    #[derive(Default)]
    struct RecordingProvider {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LlmProvider for RecordingProvider {
        fn name(&self) -> &str {
            "recording"
        }

        async fn generate(&self, prompt: &str) -> AnyResult<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("A short summary.".to_string())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl LlmProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn generate(&self, _prompt: &str) -> AnyResult<String> {
            anyhow::bail!("model unavailable")
        }
    }

    #[test]
    fn split_parses_and_chunks() {
        let chunks = split_transcript(TRANSCRIPT, &WhitespaceCounter, 6).unwrap();
        assert_eq!(
            chunks,
            vec![
                "one two three\nfour five\n".to_string(),
                "six seven eight\n".to_string()
            ]
        );
    }

    #[test]
    fn split_rejects_invalid_transcript() {
        let err = split_transcript("not a transcript", &WhitespaceCounter, 6).unwrap_err();
        assert!(matches!(err, RecapError::Transcript(_)));
    }

    #[test]
    fn counter_failure_becomes_tokenizer_error() {
        let counter = |_: &str| -> AnyResult<usize> { anyhow::bail!("no vocab") };
        let err = split_transcript(TRANSCRIPT, &counter, 6).unwrap_err();
        assert!(matches!(err, RecapError::Tokenizer(ref m) if m.contains("no vocab")));
    }

    #[tokio::test]
    async fn summarize_sends_newline_joined_chunks() {
        let provider = Arc::new(RecordingProvider::default());
        let service = TranscriptService::new(provider.clone(), Arc::new(WhitespaceCounter), 6);

        let summary = service.summarize(TRANSCRIPT.to_string()).await.unwrap();

        assert_eq!(summary.text, "A short summary.");
        assert_eq!(summary.chunk_count, 2);

        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].ends_with("one two three\nfour five\n\nsix seven eight\n"));
    }

    #[tokio::test]
    async fn summarize_reports_backend_failure() {
        let service = TranscriptService::new(
            Arc::new(FailingProvider),
            Arc::new(WhitespaceCounter),
            100,
        );

        let err = service.summarize(TRANSCRIPT.to_string()).await.unwrap_err();
        assert!(matches!(err, RecapError::Llm(ref m) if m.contains("model unavailable")));
    }

    #[tokio::test]
    async fn empty_transcript_still_reaches_the_model() {
        let provider = Arc::new(RecordingProvider::default());
        let service = TranscriptService::new(provider.clone(), Arc::new(WhitespaceCounter), 10);

        let summary = service.summarize("WEBVTT\n".to_string()).await.unwrap();

        assert_eq!(summary.chunk_count, 1);
        assert!(provider.prompts.lock().unwrap()[0].ends_with("Meeting transcript:\n"));
    }
}
