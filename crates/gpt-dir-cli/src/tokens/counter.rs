//! Token counting using tiktoken-rs.
//!
//! Uses the cl100k_base tokenizer, the same encoding the provider bills
//! with, so local counts match the invoice.

use std::sync::OnceLock;

use thiserror::Error;
use tiktoken_rs::CoreBPE;

/// Errors that can occur during token counting.
#[derive(Debug, Error)]
pub enum TokenCounterError {
    /// Failed to initialize the tokenizer.
    #[error("failed to initialize tokenizer: {0}")]
    Init(String),
}

// Loading the BPE ranks is expensive; do it once per process.
static TOKENIZER: OnceLock<CoreBPE> = OnceLock::new();

/// Deterministic token counter over the cl100k_base encoding.
pub struct TokenCounter {
    bpe: &'static CoreBPE,
}

impl TokenCounter {
    pub fn new() -> Result<Self, TokenCounterError> {
        if TOKENIZER.get().is_none() {
            let bpe =
                tiktoken_rs::cl100k_base().map_err(|e| TokenCounterError::Init(e.to_string()))?;
            // A lost race means another thread stored the same tokenizer.
            let _ = TOKENIZER.set(bpe);
        }
        TOKENIZER
            .get()
            .map(|bpe| Self { bpe })
            .ok_or_else(|| TokenCounterError::Init("tokenizer cache empty".to_string()))
    }

    /// Count tokens in a text string.
    pub fn count(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        self.bpe.encode_ordinary(text).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_counts_zero() {
        let counter = TokenCounter::new().unwrap();
        assert_eq!(counter.count(""), 0);
    }

    #[test]
    fn test_count_is_positive_for_text() {
        let counter = TokenCounter::new().unwrap();
        assert!(counter.count("hello") > 0);
    }

    #[test]
    fn test_count_is_deterministic() {
        let counter = TokenCounter::new().unwrap();
        let text = "fn main() { println!(\"Hello, world!\"); }";
        assert_eq!(counter.count(text), counter.count(text));
    }

    #[test]
    fn test_count_matches_across_instances() {
        let a = TokenCounter::new().unwrap();
        let b = TokenCounter::new().unwrap();
        assert_eq!(a.count("same text"), b.count("same text"));
    }

    #[test]
    fn test_count_handles_unicode() {
        let counter = TokenCounter::new().unwrap();
        assert!(counter.count("こんにちは 👋") > 0);
    }
}
