/*!
 * Processing context for one song.
 *
 * The context owns the whole-song result cache and a generation counter.
 * Every `process` call takes a `GenerationTicket` when it starts; switching to
 * a different line set, or resetting the context, advances the generation.
 * A call whose ticket is no longer current stops issuing requests and its
 * result is never committed to the cache.
 */

use log::debug;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use super::cache::ResultCache;
use super::pipeline::ProcessedResult;

/// Generation observed when a call started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket {
    generation: u64,
}

impl GenerationTicket {
    /// Generation captured by this ticket
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Caller-owned state for the song currently being processed
#[derive(Debug)]
pub struct PipelineContext {
    /// Line set the cached results belong to
    subject: Mutex<Option<Vec<String>>>,
    generation: AtomicU64,
    cache: ResultCache<ProcessedResult>,
}

impl PipelineContext {
    /// Create an empty context
    pub fn new(cache_enabled: bool) -> Self {
        Self {
            subject: Mutex::new(None),
            generation: AtomicU64::new(0),
            cache: ResultCache::new(cache_enabled),
        }
    }

    /// Current generation
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Start a call for `lines`, switching context if the line set changed
    pub fn enter(&self, lines: &[String]) -> GenerationTicket {
        let mut subject = self.subject.lock();
        if subject.as_deref() != Some(lines) {
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            self.cache.clear();
            *subject = Some(lines.to_vec());
            debug!("New line set of {} lines, generation {}", lines.len(), generation);
        }
        GenerationTicket { generation: self.generation() }
    }

    /// Invalidate every in-flight call and cached result
    pub fn reset(&self, subject: Option<&[String]>) {
        let mut current = self.subject.lock();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.cache.clear();
        *current = subject.map(<[String]>::to_vec);
        debug!("Pipeline context reset, generation {}", generation);
    }

    /// Whether a call holding `ticket` may still issue requests and commit
    pub fn is_current(&self, ticket: &GenerationTicket) -> bool {
        self.generation() == ticket.generation
    }

    /// Cached result for a target language
    pub fn cached(&self, target_language: &str) -> Option<ProcessedResult> {
        self.cache.get(target_language)
    }

    /// Store a result if `ticket` is still current; returns whether it was stored
    pub fn commit(&self, ticket: &GenerationTicket, target_language: &str, result: &ProcessedResult) -> bool {
        // Holding the subject lock orders the commit against `enter` and `reset`
        let _subject = self.subject.lock();
        if !self.is_current(ticket) {
            debug!(
                "Discarding stale result for '{}' (generation {} is now {})",
                target_language,
                ticket.generation,
                self.generation()
            );
            return false;
        }
        self.cache.store(target_language, result.clone());
        true
    }

    /// Drop cached results without changing the generation
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// The result cache
    pub fn cache(&self) -> &ResultCache<ProcessedResult> {
        &self.cache
    }
}

impl Default for PipelineContext {
    fn default() -> Self {
        Self::new(true)
    }
}
