/*!
 * Romanization providers.
 *
 * Each writing system gets a `RomanizationChain`: an ordered list of
 * `RomanizationStrategy` tiers, from the highest quality to the lowest.
 * The chain walks its tiers and stops at the first success, so a line is
 * always returned with some string and tier failures never propagate.
 *
 * - `japanese`: dictionary-backed kanji readings + kana to Hepburn, lazily initialized
 * - `chinese`: tone-marked pinyin
 * - `korean`: Revised Romanization
 * - `cyrillic`: Russian-preset table
 * - `brahmic`: IAST for the ISCII-derived Indic scripts
 * - `arabic`: local tashkeel stripping before generic transliteration
 * - `generic`: catch-all transliteration
 * - `remote`: phonetic romanization and transliteration over HTTP
 * - `registry`: per-script chains built once at startup
 */

use async_trait::async_trait;
use log::{debug, warn};
use std::fmt::Debug;
use std::sync::Arc;

use crate::errors::RomanizationError;
use crate::script_detection::{CharScript, ScriptType, char_script, is_translatable};
use crate::translation::chunking::chunk_by_char_count;

pub mod arabic;
pub mod brahmic;
pub mod chinese;
pub mod cyrillic;
pub mod generic;
pub mod japanese;
pub mod korean;
pub mod registry;
pub mod remote;

pub use self::registry::{Availability, ProviderRegistry};

/// One tier of a romanization chain
#[async_trait]
pub trait RomanizationStrategy: Send + Sync + Debug {
    /// Name used in logs and availability reports
    fn name(&self) -> &str;

    /// Whether `convert_batch` is a single call to a batching service
    fn supports_batch(&self) -> bool {
        false
    }

    /// Whether every conversion is a request to a remote service
    fn is_remote(&self) -> bool {
        false
    }

    /// Request ceiling for one `convert_batch` call, in UTF-16 units
    fn batch_limit(&self) -> Option<usize> {
        None
    }

    /// Romanize one line
    async fn convert(&self, text: &str) -> Result<String, RomanizationError>;

    /// Romanize many lines at once; the output must keep one line per input line
    async fn convert_batch(&self, _lines: &[String]) -> Result<Vec<String>, RomanizationError> {
        Err(RomanizationError::Unsupported("batch conversion"))
    }
}

/// Admission control for the remote tiers of a chain.
///
/// `admit` runs before every remote request; returning `false` skips that
/// tier for the line or batch at hand.
#[async_trait]
pub trait RemoteGate: Send {
    async fn admit(&mut self, tier: &str) -> bool;
}

/// Admits every remote request at once
#[derive(Debug, Default, Clone, Copy)]
pub struct Unpaced;

#[async_trait]
impl RemoteGate for Unpaced {
    async fn admit(&mut self, _tier: &str) -> bool {
        true
    }
}

/// Admits no remote request, leaving the local tiers
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalOnly;

#[async_trait]
impl RemoteGate for LocalOnly {
    async fn admit(&mut self, tier: &str) -> bool {
        debug!("Skipping remote tier {}", tier);
        false
    }
}

/// The provider for one script: tiers tried in order
#[derive(Debug, Clone)]
pub struct RomanizationChain {
    script: ScriptType,
    tiers: Vec<Arc<dyn RomanizationStrategy>>,
}

impl RomanizationChain {
    /// Create a chain from its tiers, highest quality first
    pub fn new(script: ScriptType, tiers: Vec<Arc<dyn RomanizationStrategy>>) -> Self {
        Self { script, tiers }
    }

    /// Script this chain romanizes
    pub fn script(&self) -> ScriptType {
        self.script
    }

    /// Tier names, highest quality first
    pub fn tier_names(&self) -> Vec<&str> {
        self.tiers.iter().map(|tier| tier.name()).collect()
    }

    /// Whether the text contains characters of this chain's script
    pub fn can_handle(&self, text: &str) -> bool {
        text.chars().any(|c| {
            let script = char_script(c);
            match self.script {
                ScriptType::Japanese => {
                    matches!(script, CharScript::Hiragana | CharScript::Katakana | CharScript::Han)
                }
                ScriptType::Other => c.is_alphabetic() && script != CharScript::Latin,
                expected => script.script_type() == Some(expected),
            }
        })
    }

    /// Romanize one line. Never fails: the original text is the last resort.
    pub async fn convert(&self, text: &str) -> String {
        if !is_translatable(text) {
            return text.to_string();
        }
        self.convert_tiered(text, &mut Unpaced).await
    }

    /// Romanize many lines, keeping count and order
    pub async fn convert_batch(&self, lines: &[String]) -> Vec<String> {
        self.convert_batch_with(lines, &mut Unpaced).await
    }

    /// Romanize many lines, asking `gate` before every remote request
    pub async fn convert_batch_with(
        &self,
        lines: &[String],
        gate: &mut dyn RemoteGate,
    ) -> Vec<String> {
        let positions: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| is_translatable(line))
            .map(|(idx, _)| idx)
            .collect();

        let mut output = lines.to_vec();
        if positions.is_empty() {
            return output;
        }

        let subset: Vec<String> = positions.iter().map(|&idx| lines[idx].clone()).collect();
        let converted = self.convert_subset(&subset, gate).await;
        for (idx, value) in positions.into_iter().zip(converted) {
            output[idx] = value;
        }
        output
    }

    async fn convert_subset(&self, lines: &[String], gate: &mut dyn RemoteGate) -> Vec<String> {
        let mut results = Vec::with_capacity(lines.len());

        if let Some(first) = self.tiers.first().filter(|tier| tier.supports_batch()) {
            let chunks = match first.batch_limit() {
                Some(limit) => chunk_by_char_count(lines, limit),
                None => vec![lines.to_vec()],
            };

            for chunk in chunks {
                if first.is_remote() && !gate.admit(first.name()).await {
                    break;
                }
                match first.convert_batch(&chunk).await {
                    Ok(converted) if converted.len() == chunk.len() => results.extend(converted),
                    Ok(converted) => {
                        warn!(
                            "{} batch returned {} lines for {}, retrying line by line",
                            first.name(),
                            converted.len(),
                            chunk.len()
                        );
                        break;
                    }
                    Err(e) => {
                        warn!("{} batch failed, retrying line by line: {}", first.name(), e);
                        break;
                    }
                }
            }
        }

        // Lines the batch tier did not cover
        let done = results.len();
        for line in &lines[done..] {
            results.push(self.convert_tiered(line, gate).await);
        }
        results
    }

    async fn convert_tiered(&self, text: &str, gate: &mut dyn RemoteGate) -> String {
        for tier in &self.tiers {
            if tier.is_remote() && !gate.admit(tier.name()).await {
                continue;
            }
            match tier.convert(text).await {
                Ok(romanized) => return romanized,
                Err(e) => warn!(
                    "{} romanization failed for {} text, trying next tier: {}",
                    tier.name(),
                    self.script,
                    e
                ),
            }
        }

        debug!("All {} romanization tiers failed, echoing the line", self.script);
        text.to_string()
    }
}
