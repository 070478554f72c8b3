/*!
 * Result caching.
 *
 * Whole-song results are keyed by target-language code, single-line
 * romanizations by the literal line text. The cache lives for the session
 * and is not bounded; clones share the same storage.
 */

use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;
use log::debug;

/// In-memory cache keyed by string
#[derive(Debug)]
pub struct ResultCache<V> {
    /// Internal cache storage
    cache: Arc<RwLock<HashMap<String, V>>>,

    /// Cache hit counter
    hits: Arc<RwLock<usize>>,

    /// Cache miss counter
    misses: Arc<RwLock<usize>>,

    /// Whether caching is enabled
    enabled: bool,
}

impl<V: Clone> ResultCache<V> {
    /// Create a new cache
    pub fn new(enabled: bool) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            hits: Arc::new(RwLock::new(0)),
            misses: Arc::new(RwLock::new(0)),
            enabled,
        }
    }

    /// Get a value from the cache
    pub fn get(&self, key: &str) -> Option<V> {
        if !self.enabled {
            return None;
        }

        let cache = self.cache.read();
        match cache.get(key) {
            Some(value) => {
                *self.hits.write() += 1;
                debug!("Cache hit for '{}'", truncate_text(key, 30));
                Some(value.clone())
            }
            None => {
                *self.misses.write() += 1;
                debug!("Cache miss for '{}'", truncate_text(key, 30));
                None
            }
        }
    }

    /// Store a value, replacing any previous one under the same key
    pub fn store(&self, key: &str, value: V) {
        if !self.enabled {
            return;
        }

        self.cache.write().insert(key.to_string(), value);
        debug!("Cached result for '{}'", truncate_text(key, 30));
    }

    /// Get cache statistics: hits, misses and hit rate
    pub fn stats(&self) -> (usize, usize, f64) {
        let hits = *self.hits.read();
        let misses = *self.misses.read();
        let total = hits + misses;

        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        (hits, misses, hit_rate)
    }

    /// Clear the cache
    pub fn clear(&self) {
        self.cache.write().clear();
        *self.hits.write() = 0;
        *self.misses.write() = 0;

        debug!("Result cache cleared");
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    /// Check if the cache is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl<V: Clone> Default for ResultCache<V> {
    fn default() -> Self {
        Self::new(true)
    }
}

impl<V> Clone for ResultCache<V> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            hits: self.hits.clone(),
            misses: self.misses.clone(),
            enabled: self.enabled,
        }
    }
}

/// Truncate text to a maximum number of characters with ellipsis
fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
