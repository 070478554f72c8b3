/*!
 * Per-script romanization chains, built once at startup.
 *
 * Tiers that depend on a remote service switched off in the configuration are
 * recorded as disabled and left out of their chain. The Japanese analyzer is
 * resolved lazily on first use; its outcome shows up in `availability()`.
 */

use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

use crate::app_config::Config;
use crate::providers::{RemoteTranslator, RemoteTransliterator};
use crate::script_detection::{ScriptType, segment_line};
use crate::translation::cache::ResultCache;
use super::arabic::ArabicLocal;
use super::brahmic::BrahmicRomanizer;
use super::chinese::PinyinRomanizer;
use super::cyrillic::CyrillicRomanizer;
use super::generic::GenericTransliterator;
use super::japanese::JapaneseAnalyzer;
use super::korean::RevisedRomanizer;
use super::remote::{AksharamukhaStrategy, GooglePhonetic};
use super::{RemoteGate, RomanizationChain, RomanizationStrategy};

/// Target scheme for the Indic transliteration tier
const INDIC_TARGET_SCHEME: &str = "IAST";
/// Target scheme for the Arabic transliteration tier
const ARABIC_TARGET_SCHEME: &str = "ISO";

/// Whether a tier can be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Ready,
    Disabled(String),
}

/// Status of one tier of one chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierStatus {
    pub script: ScriptType,
    pub tier: String,
    pub availability: Availability,
}

/// Collects the tiers of one chain and their statuses
struct ChainPlan {
    script: ScriptType,
    tiers: Vec<Arc<dyn RomanizationStrategy>>,
    statuses: Vec<TierStatus>,
}

impl ChainPlan {
    fn new(script: ScriptType) -> Self {
        Self {
            script,
            tiers: Vec::new(),
            statuses: Vec::new(),
        }
    }

    fn push(&mut self, tier: Arc<dyn RomanizationStrategy>, disabled: Option<&String>) {
        let availability = match disabled {
            Some(reason) => Availability::Disabled(reason.clone()),
            None => Availability::Ready,
        };
        self.statuses.push(TierStatus {
            script: self.script,
            tier: tier.name().to_string(),
            availability: availability.clone(),
        });
        if availability == Availability::Ready {
            self.tiers.push(tier);
        }
    }
}

/// Romanization chains for every script
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    chains: HashMap<ScriptType, RomanizationChain>,
    statuses: Vec<TierStatus>,
    japanese: Arc<JapaneseAnalyzer>,
    line_cache: ResultCache<String>,
}

impl ProviderRegistry {
    /// Build every chain from the configuration and the remote services
    pub fn new(
        config: &Config,
        translator: Arc<dyn RemoteTranslator>,
        transliterator: Arc<dyn RemoteTransliterator>,
    ) -> Self {
        let remote_disabled = (!config.romanization.remote_enabled)
            .then(|| "remote romanization disabled in configuration".to_string());
        let aksharamukha_disabled = remote_disabled.clone().or_else(|| {
            (!config.services.aksharamukha.enabled)
                .then(|| "aksharamukha disabled in configuration".to_string())
        });

        let japanese = Arc::new(JapaneseAnalyzer::new(
            config.romanization.japanese_dictionary.clone(),
        ));
        let generic: Arc<dyn RomanizationStrategy> = Arc::new(GenericTransliterator::new());

        let mut chains = HashMap::new();
        let mut statuses = Vec::new();

        for script in ScriptType::ALL {
            let mut plan = ChainPlan::new(script);

            match script {
                ScriptType::Japanese => plan.push(japanese.clone(), None),
                ScriptType::Chinese => plan.push(Arc::new(PinyinRomanizer), None),
                ScriptType::Korean => plan.push(Arc::new(RevisedRomanizer), None),
                ScriptType::Cyrillic => plan.push(Arc::new(CyrillicRomanizer), None),
                ScriptType::Tamil | ScriptType::Malayalam | ScriptType::Bengali => {
                    if let Some(scheme) = script.transliteration_scheme() {
                        let tier = AksharamukhaStrategy::new(
                            transliterator.clone(),
                            scheme,
                            INDIC_TARGET_SCHEME,
                        );
                        plan.push(Arc::new(tier), aksharamukha_disabled.as_ref());
                    }
                    if let Some(local) = BrahmicRomanizer::new(script) {
                        plan.push(Arc::new(local), None);
                    }
                }
                ScriptType::Devanagari
                | ScriptType::Gujarati
                | ScriptType::Gurmukhi
                | ScriptType::Telugu
                | ScriptType::Kannada
                | ScriptType::Odia => {
                    if let Some(local) = BrahmicRomanizer::new(script) {
                        plan.push(Arc::new(local), None);
                    }
                }
                ScriptType::Arabic => {
                    plan.push(
                        Arc::new(GooglePhonetic::new(translator.clone(), "ar")),
                        remote_disabled.as_ref(),
                    );
                    let tier = AksharamukhaStrategy::new(
                        transliterator.clone(),
                        "Arab",
                        ARABIC_TARGET_SCHEME,
                    );
                    plan.push(Arc::new(tier), aksharamukha_disabled.as_ref());
                    plan.push(Arc::new(ArabicLocal), None);
                }
                ScriptType::Hebrew => {
                    plan.push(
                        Arc::new(GooglePhonetic::new(translator.clone(), "iw")),
                        remote_disabled.as_ref(),
                    );
                }
                // No dedicated Thai romanizer; the generic pass drops to ASCII
                ScriptType::Thai | ScriptType::Other => {}
            }

            // Arabic ends with its own local tier, which already is a generic pass
            if script != ScriptType::Arabic {
                plan.push(generic.clone(), None);
            }

            let chain = RomanizationChain::new(script, plan.tiers);
            debug!("{} romanization chain: {}", script, chain.tier_names().join(" -> "));
            chains.insert(script, chain);
            statuses.extend(plan.statuses);
        }

        Self {
            chains,
            statuses,
            japanese,
            line_cache: ResultCache::new(config.pipeline.cache_enabled),
        }
    }

    /// Chain for a script
    pub fn chain(&self, script: ScriptType) -> Option<&RomanizationChain> {
        self.chains.get(&script)
    }

    /// Status of every tier, including the outcome of lazy initialization
    pub fn availability(&self) -> Vec<TierStatus> {
        let analyzer_name = self.japanese.name().to_string();
        self.statuses
            .iter()
            .cloned()
            .map(|mut status| {
                if status.tier == analyzer_name {
                    if let Some(Err(reason)) = self.japanese.initialization_status() {
                        status.availability = Availability::Disabled(reason);
                    }
                }
                status
            })
            .collect()
    }

    /// Like `availability`, but runs the lazy initializations first so their
    /// failures are reported even before any line was romanized
    pub async fn resolve_availability(&self) -> Vec<TierStatus> {
        if let Err(e) = self.japanese.initialize().await {
            debug!("Japanese analyzer unavailable: {}", e);
        }
        self.availability()
    }

    /// The shared Japanese analyzer
    pub fn japanese_analyzer(&self) -> &Arc<JapaneseAnalyzer> {
        &self.japanese
    }

    /// Romanize lines of one script, keeping count and order
    pub async fn romanize_lines(&self, script: ScriptType, lines: &[String]) -> Vec<String> {
        match self.chain(script) {
            Some(chain) => chain.convert_batch(lines).await,
            None => lines.to_vec(),
        }
    }

    /// Romanize lines of one script, with every remote request going through `gate`
    pub async fn romanize_lines_with(
        &self,
        script: ScriptType,
        lines: &[String],
        gate: &mut dyn RemoteGate,
    ) -> Vec<String> {
        match self.chain(script) {
            Some(chain) => chain.convert_batch_with(lines, gate).await,
            None => lines.to_vec(),
        }
    }

    /// Romanize a single line that may mix scripts.
    ///
    /// Each non-Latin segment goes through its own script's chain, Latin and
    /// neutral segments are kept, and the pieces are joined with one space.
    pub async fn romanize_line(&self, text: &str) -> String {
        if let Some(cached) = self.line_cache.get(text) {
            return cached;
        }

        let mut pieces = Vec::new();
        for segment in segment_line(text) {
            let piece = match segment.script.script_type().and_then(|script| self.chain(script)) {
                Some(chain) => chain.convert(&segment.text).await,
                None => segment.text.clone(),
            };
            let piece = piece.trim();
            if !piece.is_empty() {
                pieces.push(piece.to_string());
            }
        }

        let romanized = if pieces.is_empty() { text.to_string() } else { pieces.join(" ") };
        self.line_cache.store(text, romanized.clone());
        romanized
    }

    /// Single-line romanization cache
    pub fn line_cache(&self) -> &ResultCache<String> {
        &self.line_cache
    }
}
