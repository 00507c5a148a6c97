//! Bounded memory of recent line translations.
//!
//! The same screen text is re-recognized on every frame, so most lines of a
//! static region repeat. Entries are evicted oldest-first once the capacity
//! is reached; a capacity of 0 disables the cache.

use crate::language::Language;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    from: Language,
    to: Language,
}

impl CacheKey {
    fn new(text: &str, from: Language, to: Language) -> Self {
        Self {
            text: text.to_string(),
            from,
            to,
        }
    }
}

#[derive(Debug, Default)]
pub struct TranslationCache {
    entries: HashMap<CacheKey, String>,
    order: VecDeque<CacheKey>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl TranslationCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity.min(1024)),
            order: VecDeque::new(),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    pub fn get(&mut self, text: &str, from: Language, to: Language) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }
        match self.entries.get(&CacheKey::new(text, from, to)) {
            Some(translated) => {
                self.hits += 1;
                log::trace!("Cache hit for '{}' ({} -> {})", truncate(text, 30), from, to);
                Some(translated.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Stores a successful translation. Callers never store failures.
    pub fn store(&mut self, text: &str, from: Language, to: Language, translated: &str) {
        if !self.is_enabled() {
            return;
        }
        let key = CacheKey::new(text, from, to);
        if let Some(existing) = self.entries.get_mut(&key) {
            *existing = translated.to_string();
            return;
        }
        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, translated.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (hits, misses)
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
