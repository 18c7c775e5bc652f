//! Token-bounded transcript chunking

use anyhow::Result;

use crate::transcript::normalize::normalize_caption;
use crate::transcript::vtt::Cue;

/// Separator placed between chunks when they are joined into one model input.
pub const CHUNK_SEPARATOR: &str = "\n";

/// Measures text length in model tokens.
///
/// Implementations must be deterministic for a fixed tokenizer. Failures are
/// returned to the caller untouched.
pub trait TokenCounter: Send + Sync {
    fn count_tokens(&self, text: &str) -> Result<usize>;
}

impl<F> TokenCounter for F
where
    F: Fn(&str) -> Result<usize> + Send + Sync,
{
    fn count_tokens(&self, text: &str) -> Result<usize> {
        self(text)
    }
}

/// Group cues into chunks whose token count stays under `token_limit`.
///
/// Cues are taken in order and their normalized text is appended to the open
/// chunk while the running token count, including the new cue, stays below the
/// limit. The cue that brings the count to the limit or past it closes the open
/// chunk and starts the next one, with the count reset to its own tokens. A cue
/// is never split, so a single cue over the limit forms its own chunk.
///
/// The last chunk is always emitted, which means an empty cue list yields one
/// empty chunk.
///
/// `token_limit` must be greater than zero.
pub fn split_cues<C>(cues: &[Cue], counter: &C, token_limit: usize) -> Result<Vec<String>>
where
    C: TokenCounter + ?Sized,
{
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut cues_in_chunk = 0usize;
    let mut token_count = 0usize;

    for cue in cues {
        let message = normalize_caption(&cue.text);
        let tokens = counter.count_tokens(&message)?;
        token_count += tokens;

        if token_count < token_limit {
            current.push_str(&message);
            cues_in_chunk += 1;
        } else {
            // The first cue of a chunk has nothing to close behind it.
            if cues_in_chunk > 0 {
                chunks.push(std::mem::take(&mut current));
            }
            current = message;
            cues_in_chunk = 1;
            token_count = tokens;
        }
    }

    chunks.push(current);

    tracing::debug!(
        "Split {} cues into {} chunks (limit {} tokens)",
        cues.len(),
        chunks.len(),
        token_limit
    );

    Ok(chunks)
}

/// Join chunks into the single string handed to the summarizer.
pub fn join_chunks(chunks: &[String]) -> String {
    chunks.join(CHUNK_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn cues(texts: &[&str]) -> Vec<Cue> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| Cue::new(i as f64, i as f64 + 1.0, *text))
            .collect()
    }

    fn words(text: &str) -> Result<usize> {
        Ok(text.split_whitespace().count())
    }

    fn table(entries: &[(&'static str, usize)]) -> impl Fn(&str) -> Result<usize> + Send + Sync {
        let counts: HashMap<&'static str, usize> = entries.iter().copied().collect();
        move |text: &str| Ok(counts[text])
    }

    #[test]
    fn empty_transcript_yields_one_empty_chunk() {
        let chunks = split_cues(&[], &words, 10).unwrap();
        assert_eq!(chunks, vec![String::new()]);
    }

    #[test]
    fn small_single_cue_is_one_chunk() {
        let chunks = split_cues(&cues(&["1\nhello there"]), &words, 10).unwrap();
        assert_eq!(chunks, vec!["hello there\n".to_string()]);
    }

    #[test]
    fn oversize_single_cue_is_not_split() {
        let text = "one two three four five six seven";
        let chunks = split_cues(&cues(&[text]), &words, 3).unwrap();
        assert_eq!(chunks, vec![format!("{text}\n")]);
    }

    #[test]
    fn single_cue_exactly_at_limit_is_one_chunk() {
        let chunks = split_cues(&cues(&["a b c"]), &words, 3).unwrap();
        assert_eq!(chunks, vec!["a b c\n".to_string()]);
    }

    #[test]
    fn closes_chunk_when_running_total_reaches_limit() {
        let counter = table(&[("A\n", 4), ("B\n", 4), ("C\n", 4)]);

        let chunks = split_cues(&cues(&["A", "B", "C"]), &counter, 10).unwrap();

        assert_eq!(chunks, vec!["A\nB\n".to_string(), "C\n".to_string()]);
    }

    #[test]
    fn boundary_is_inclusive_of_the_limit() {
        // 4 + 6 = 10 is not below the limit, so B starts a new chunk.
        let counter = table(&[("A\n", 4), ("B\n", 6), ("C\n", 3)]);

        let chunks = split_cues(&cues(&["A", "B", "C"]), &counter, 10).unwrap();

        assert_eq!(chunks, vec!["A\n".to_string(), "B\nC\n".to_string()]);
    }

    #[test]
    fn oversize_cue_between_small_ones_stands_alone() {
        let counter = table(&[("a\n", 2), ("big\n", 50), ("b\n", 2)]);

        let chunks = split_cues(&cues(&["a", "big", "b"]), &counter, 10).unwrap();

        assert_eq!(
            chunks,
            vec!["a\n".to_string(), "big\n".to_string(), "b\n".to_string()]
        );
    }

    #[test]
    fn repartition_is_lossless() {
        let texts = [
            "1\nGood morning",
            "2\nlet's review the quarterly numbers",
            "3\nrevenue is up",
            "4\nbut churn also increased slightly this month",
            "5",
            "6\nwe need an action plan",
            "7\nokay",
        ];
        let cues = cues(&texts);
        let expected: String = cues.iter().map(|c| normalize_caption(&c.text)).collect();

        for limit in 1..=20 {
            let chunks = split_cues(&cues, &words, limit).unwrap();

            assert!(!chunks.is_empty());
            assert_eq!(chunks.concat(), expected, "limit {limit}");
        }
    }

    #[test]
    fn closed_chunks_stay_under_limit_unless_single_cue() {
        let texts = ["a b", "c d e", "f", "g h i j k l", "m n", "o"];
        let chunks = split_cues(&cues(&texts), &words, 5).unwrap();

        for chunk in &chunks {
            let tokens = words(chunk).unwrap();
            let cue_count = chunk.lines().count();
            assert!(tokens < 5 || cue_count == 1, "chunk {chunk:?}");
        }
    }

    #[test]
    fn counter_failure_propagates() {
        let counter = |text: &str| {
            if text.contains("boom") {
                anyhow::bail!("tokenizer unavailable")
            }
            Ok(1usize)
        };

        let err = split_cues(&cues(&["fine", "boom"]), &counter, 10).unwrap_err();
        assert!(err.to_string().contains("tokenizer unavailable"));
    }

    #[test]
    fn joins_chunks_with_newline() {
        let chunks = vec!["A\nB\n".to_string(), "C\n".to_string()];
        assert_eq!(join_chunks(&chunks), "A\nB\n\nC\n");
    }
}
