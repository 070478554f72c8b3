/*!
 * Lyrics translation and romanization pipeline.
 *
 * `LyricsPipeline::process` turns a song's lines into a `ProcessedResult`
 * with one translation and one romanization per line. It never fails: every
 * provider error is absorbed here and the affected lines come back unchanged.
 *
 * Flow of one call:
 * 1. Enter the `PipelineContext`, answer from its cache when possible
 * 2. Keep the translatable lines and classify their dominant script
 * 3. Scripts without a good local romanizer get one combined request per
 *    chunk (translation plus romanization); the others get translation-only
 *    requests while the local chain romanizes concurrently
 * 4. Chunks go out one at a time with a fixed delay between requests; a
 *    failed chunk is re-split for the secondary translator, and lines neither
 *    service could handle pass through
 * 5. Lines the service left without a romanization go through the script's
 *    chain; its remote tiers share the call's pacing and generation check,
 *    and are skipped once the call is stale or the primary was rate limited
 * 6. Results are scattered back into the original line positions and cached
 *    if the call's generation is still current
 */

use async_trait::async_trait;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{Config, PipelineConfig};
use crate::errors::ProviderError;
use crate::providers::aksharamukha::Aksharamukha;
use crate::providers::google::GoogleTranslate;
use crate::providers::mymemory::MyMemory;
use crate::providers::{RemoteTranslator, TranslationRequest, TranslationResponse};
use crate::romanization::{LocalOnly, ProviderRegistry, RemoteGate};
use crate::script_detection::{ScriptType, detect_script, is_translatable};
use super::chunking::{chunk_by_char_count, split_response_lines};
use super::context::{GenerationTicket, PipelineContext};

/// Translation and romanization of a song, index-aligned with its lines
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProcessedResult {
    /// One translation per input line
    pub translated: Vec<String>,
    /// One romanization per input line
    pub romanized: Vec<String>,
}

impl ProcessedResult {
    /// Result that echoes the original lines in both fields
    pub fn passthrough(lines: &[String]) -> Self {
        Self {
            translated: lines.to_vec(),
            romanized: lines.to_vec(),
        }
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.translated.len()
    }

    /// Whether the result has no lines
    pub fn is_empty(&self) -> bool {
        self.translated.is_empty()
    }
}

/// Spaces consecutive requests of one call
struct Pacer {
    delay: Duration,
    sent: bool,
}

impl Pacer {
    fn new(delay: Duration) -> Self {
        Self { delay, sent: false }
    }

    /// Wait before the next request, except for the first
    async fn ready(&mut self) {
        if self.sent && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.sent = true;
    }

    /// Wait for the next request slot; false once the call has gone stale
    async fn admit(&mut self, context: &PipelineContext, ticket: &GenerationTicket) -> bool {
        if !context.is_current(ticket) {
            return false;
        }
        self.ready().await;
        context.is_current(ticket)
    }
}

/// Remote romanization requests of one call, paced like its translations
struct PacedGate<'a> {
    context: &'a PipelineContext,
    ticket: GenerationTicket,
    pacer: &'a mut Pacer,
}

#[async_trait]
impl RemoteGate for PacedGate<'_> {
    async fn admit(&mut self, tier: &str) -> bool {
        let admitted = self.pacer.admit(self.context, &self.ticket).await;
        if !admitted {
            debug!("Generation changed, skipping {}", tier);
        }
        admitted
    }
}

/// Translated lines of a subset, in order
#[derive(Debug, Default)]
struct Fetched {
    translated: Vec<String>,
    /// Romanization from the service; `None` means the local chain fills it in
    romanized: Vec<Option<String>>,
    /// Some lines were passed through instead of translated
    degraded: bool,
    /// The primary service answered with a rate limit
    rate_limited: bool,
}

impl Fetched {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            translated: Vec::with_capacity(capacity),
            romanized: Vec::with_capacity(capacity),
            degraded: false,
            rate_limited: false,
        }
    }

    fn push_translated(&mut self, translated: Vec<String>, romanized: Vec<Option<String>>) {
        self.translated.extend(translated);
        self.romanized.extend(romanized);
    }

    fn pass_through(&mut self, lines: &[String]) {
        self.translated.extend_from_slice(lines);
        self.romanized.extend(std::iter::repeat_n(None, lines.len()));
        self.degraded = true;
    }
}

/// Split a primary response into per-line translation and romanization
fn split_primary(
    response: TranslationResponse,
    expected: usize,
    include_romanization: bool,
) -> Result<(Vec<String>, Vec<Option<String>>), ProviderError> {
    let translated = split_response_lines(&response.translated, expected);
    if translated.len() != expected {
        return Err(ProviderError::LineCountMismatch { expected, actual: translated.len() });
    }

    let romanized = match response.romanized.filter(|_| include_romanization) {
        Some(block) => {
            let lines = split_response_lines(&block, expected);
            if lines.len() == expected {
                lines.into_iter().map(Some).collect()
            } else {
                warn!(
                    "Romanization block has {} lines for {}, using local romanization",
                    lines.len(),
                    expected
                );
                vec![None; expected]
            }
        }
        None => vec![None; expected],
    };

    Ok((translated, romanized))
}

/// The orchestrator
#[derive(Debug, Clone)]
pub struct LyricsPipeline {
    primary: Arc<dyn RemoteTranslator>,
    secondary: Arc<dyn RemoteTranslator>,
    registry: Arc<ProviderRegistry>,
    context: Arc<PipelineContext>,
    chunk_delay: Duration,
}

impl LyricsPipeline {
    /// Create a pipeline talking to the configured services
    pub fn new(config: &Config) -> Self {
        let services = &config.services;
        let google: Arc<dyn RemoteTranslator> = Arc::new(GoogleTranslate::new(
            services.google.endpoint.clone(),
            services.google.max_chars_per_request,
            services.google.timeout_secs,
        ));
        let mymemory: Arc<dyn RemoteTranslator> = Arc::new(MyMemory::new(
            services.mymemory.endpoint.clone(),
            services.mymemory.max_chars_per_request,
            services.mymemory.timeout_secs,
            services.mymemory.email.clone(),
        ));
        let aksharamukha = Arc::new(Aksharamukha::new(
            services.aksharamukha.endpoint.clone(),
            services.aksharamukha.timeout_secs,
        ));

        let registry = ProviderRegistry::new(config, google.clone(), aksharamukha);
        Self::with_services(google, mymemory, registry, &config.pipeline)
    }

    /// Create a pipeline from already built services
    pub fn with_services(
        primary: Arc<dyn RemoteTranslator>,
        secondary: Arc<dyn RemoteTranslator>,
        registry: ProviderRegistry,
        settings: &PipelineConfig,
    ) -> Self {
        Self {
            primary,
            secondary,
            registry: Arc::new(registry),
            context: Arc::new(PipelineContext::new(settings.cache_enabled)),
            chunk_delay: Duration::from_millis(settings.chunk_delay_ms),
        }
    }

    /// The romanization registry
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// The processing context
    pub fn context(&self) -> &PipelineContext {
        &self.context
    }

    /// Translate and romanize every line. Never fails.
    pub async fn process(&self, lines: &[String], target_language: &str) -> ProcessedResult {
        let ticket = self.context.enter(lines);

        if let Some(cached) = self.context.cached(target_language) {
            debug!("Using cached result for {} lines ({})", lines.len(), target_language);
            return cached;
        }

        let positions: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| is_translatable(line))
            .map(|(idx, _)| idx)
            .collect();

        let mut result = ProcessedResult::passthrough(lines);
        if positions.is_empty() {
            debug!("Nothing to translate in {} lines", lines.len());
            self.context.commit(&ticket, target_language, &result);
            return result;
        }

        let subset: Vec<String> = positions.iter().map(|&idx| lines[idx].clone()).collect();
        let script = detect_script(&subset);
        info!(
            "Processing {} of {} lines as {} into {}",
            subset.len(),
            lines.len(),
            script,
            target_language
        );

        let mut pacer = Pacer::new(self.chunk_delay);
        let (translated, romanized, degraded) = if script.needs_remote_romanization() {
            let fetched = self.fetch(&subset, target_language, true, &ticket, &mut pacer).await;
            let romanized = if fetched.rate_limited || !self.context.is_current(&ticket) {
                debug!("Romanizing the remaining {} lines with local tiers only", script);
                self.fill_romanization(script, &subset, fetched.romanized, &mut LocalOnly).await
            } else {
                let mut gate = PacedGate {
                    context: &self.context,
                    ticket,
                    pacer: &mut pacer,
                };
                self.fill_romanization(script, &subset, fetched.romanized, &mut gate).await
            };
            (fetched.translated, romanized, fetched.degraded)
        } else {
            // These chains are local; translation alone uses the pacer
            let mut local = LocalOnly;
            let (fetched, romanized) = tokio::join!(
                self.fetch(&subset, target_language, false, &ticket, &mut pacer),
                self.registry.romanize_lines_with(script, &subset, &mut local),
            );
            (fetched.translated, romanized, fetched.degraded)
        };

        for ((idx, translated), romanized) in positions.into_iter().zip(translated).zip(romanized) {
            result.translated[idx] = translated;
            result.romanized[idx] = romanized;
        }

        if degraded {
            debug!("Not caching a partially passed-through result for {}", target_language);
        } else {
            self.context.commit(&ticket, target_language, &result);
        }
        result
    }

    /// Romanize lines the remote service left without a romanization
    async fn fill_romanization(
        &self,
        script: ScriptType,
        lines: &[String],
        romanized: Vec<Option<String>>,
        gate: &mut dyn RemoteGate,
    ) -> Vec<String> {
        let missing: Vec<usize> = romanized
            .iter()
            .enumerate()
            .filter(|(_, value)| value.is_none())
            .map(|(idx, _)| idx)
            .collect();

        let local = if missing.is_empty() {
            Vec::new()
        } else {
            debug!("Romanizing {} lines locally", missing.len());
            let subset: Vec<String> = missing.iter().map(|&idx| lines[idx].clone()).collect();
            self.registry.romanize_lines_with(script, &subset, gate).await
        };

        let mut output: Vec<String> = romanized
            .into_iter()
            .zip(lines)
            .map(|(value, line)| value.unwrap_or_else(|| line.clone()))
            .collect();
        for (idx, value) in missing.into_iter().zip(local) {
            output[idx] = value;
        }
        output
    }

    /// Translate lines chunk by chunk, falling back to the secondary service
    async fn fetch(
        &self,
        lines: &[String],
        target_language: &str,
        include_romanization: bool,
        ticket: &GenerationTicket,
        pacer: &mut Pacer,
    ) -> Fetched {
        let chunks = chunk_by_char_count(lines, self.primary.max_chars());
        let mut fetched = Fetched::with_capacity(lines.len());
        debug!(
            "Sending {} lines in {} chunks to {}",
            lines.len(),
            chunks.len(),
            self.primary.name()
        );

        for chunk in chunks {
            if !pacer.admit(&self.context, ticket).await {
                debug!("Generation changed, passing {} lines through", chunk.len());
                fetched.pass_through(&chunk);
                continue;
            }

            let request = TranslationRequest::new(chunk.join("\n"), target_language)
                .with_romanization(include_romanization);

            let response = self.primary.translate(&request).await;
            match response.and_then(|r| split_primary(r, chunk.len(), include_romanization)) {
                Ok((translated, romanized)) => fetched.push_translated(translated, romanized),
                Err(e) => {
                    if matches!(e, ProviderError::RateLimitExceeded(_)) {
                        fetched.rate_limited = true;
                    }
                    warn!(
                        "{} failed for a {}-line chunk, falling back to {}: {}",
                        self.primary.name(),
                        chunk.len(),
                        self.secondary.name(),
                        e
                    );
                    self.fetch_secondary(&chunk, target_language, ticket, pacer, &mut fetched)
                        .await;
                }
            }
        }

        fetched
    }

    /// Translate one failed chunk with the secondary service
    async fn fetch_secondary(
        &self,
        chunk: &[String],
        target_language: &str,
        ticket: &GenerationTicket,
        pacer: &mut Pacer,
        fetched: &mut Fetched,
    ) {
        let sub_chunks = chunk_by_char_count(chunk, self.secondary.max_chars());
        let mut failed = false;

        for sub_chunk in sub_chunks {
            if failed || !pacer.admit(&self.context, ticket).await {
                fetched.pass_through(&sub_chunk);
                continue;
            }

            let request = TranslationRequest::new(sub_chunk.join("\n"), target_language);
            let translated = self.secondary.translate(&request).await.and_then(|response| {
                let lines = split_response_lines(&response.translated, sub_chunk.len());
                if lines.len() == sub_chunk.len() {
                    Ok(lines)
                } else {
                    Err(ProviderError::LineCountMismatch {
                        expected: sub_chunk.len(),
                        actual: lines.len(),
                    })
                }
            });

            match translated {
                Ok(lines) => fetched.push_translated(lines, vec![None; sub_chunk.len()]),
                Err(e @ ProviderError::LineCountMismatch { .. }) => {
                    warn!(
                        "{} misaligned a {}-line chunk, passing it through: {}",
                        self.secondary.name(),
                        sub_chunk.len(),
                        e
                    );
                    fetched.pass_through(&sub_chunk);
                }
                Err(e) => {
                    error!(
                        "{} failed too, passing the rest of the chunk through: {}",
                        self.secondary.name(),
                        e
                    );
                    fetched.pass_through(&sub_chunk);
                    failed = true;
                }
            }
        }
    }

    /// Invalidate in-flight calls and cached results, e.g. when the song changes
    pub fn reset_context(&self, subject: Option<&[String]>) {
        self.context.reset(subject);
    }

    /// Drop every cached result
    pub fn clear_cache(&self) {
        self.context.clear_cache();
        self.registry.line_cache().clear();
    }

    /// Romanize a single line that may mix scripts
    pub async fn romanize_line(&self, text: &str) -> String {
        self.registry.romanize_line(text).await
    }
}
