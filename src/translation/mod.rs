/*!
 * Translation pipeline for song lyrics.
 *
 * This module contains the orchestration that turns lyric lines into
 * translations and romanizations. It is split into several submodules:
 *
 * - `pipeline`: the orchestrator and its result type
 * - `chunking`: grouping lines under a service's request ceiling
 * - `cache`: in-memory result caching
 * - `context`: per-song state with the generation counter
 */

// Re-export main types for easier usage
pub use self::cache::ResultCache;
pub use self::context::{GenerationTicket, PipelineContext};
pub use self::pipeline::{LyricsPipeline, ProcessedResult};

// Submodules
pub mod cache;
pub mod chunking;
pub mod context;
pub mod pipeline;
