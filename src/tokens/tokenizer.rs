//! The subword tokenizer seam.

use super::vocabulary::{shared_table, Vocabulary};
use crate::Result;
use std::sync::Arc;
use tiktoken_rs::CoreBPE;

/// Encodes text into token ids. Only the length of the encoding is used for
/// accounting, but implementations must be deterministic for identical input.
pub trait Tokenizer: Send + Sync {
    fn encode(&self, text: &str) -> Vec<u32>;

    fn count(&self, text: &str) -> usize {
        self.encode(text).len()
    }
}

/// Byte-pair-encoding tokenizer over a shared `tiktoken` vocabulary table.
#[derive(Clone)]
pub struct BpeTokenizer {
    vocabulary: Vocabulary,
    bpe: Arc<CoreBPE>,
}

impl BpeTokenizer {
    /// Load (or reuse) the table for `vocabulary`.
    pub fn load(vocabulary: Vocabulary) -> Result<Self> {
        Ok(Self {
            vocabulary,
            bpe: shared_table(vocabulary)?,
        })
    }

    pub fn vocabulary(&self) -> Vocabulary {
        self.vocabulary
    }
}

impl std::fmt::Debug for BpeTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BpeTokenizer")
            .field("vocabulary", &self.vocabulary)
            .finish_non_exhaustive()
    }
}

impl Tokenizer for BpeTokenizer {
    // Special-token text such as `<|endoftext|>` is encoded as ordinary text.
    fn encode(&self, text: &str) -> Vec<u32> {
        self.bpe.encode_ordinary(text)
    }
}
