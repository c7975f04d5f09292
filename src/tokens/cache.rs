//! Memoising tokenizer wrapper.

use super::tokenizer::Tokenizer;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

/// Caches token counts per text in a bounded LRU.
///
/// Requests repeat the same role names, function names and system prompts
/// many times, so counts are worth keeping. `encode` is never cached.
pub struct CachingTokenizer {
    inner: Arc<dyn Tokenizer>,
    cache: Mutex<LruCache<String, usize>>,
}

impl CachingTokenizer {
    pub fn new(inner: Arc<dyn Tokenizer>, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn clear_cache(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Tokenizer for CachingTokenizer {
    fn encode(&self, text: &str) -> Vec<u32> {
        self.inner.encode(text)
    }

    fn count(&self, text: &str) -> usize {
        if let Some(&n) = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(text)
        {
            return n;
        }
        // Count outside the lock; a racing insert of the same text is harmless.
        let n = self.inner.count(text);
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(text.to_string(), n);
        n
    }
}
