/*!
 * Tests for romanization chains and the provider registry
 */

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use sly_lyrics::app_config::Config;
use sly_lyrics::errors::RomanizationError;
use sly_lyrics::providers::mock::{MockTranslator, MockTransliterator};
use sly_lyrics::romanization::generic::GenericTransliterator;
use sly_lyrics::romanization::{Availability, ProviderRegistry, RomanizationChain, RomanizationStrategy};
use sly_lyrics::script_detection::ScriptType;

use crate::common;

/// Tier that always fails and counts its calls
#[derive(Debug, Default)]
struct BrokenTier {
    calls: AtomicUsize,
}

#[async_trait]
impl RomanizationStrategy for BrokenTier {
    fn name(&self) -> &str {
        "broken"
    }

    async fn convert(&self, _text: &str) -> Result<String, RomanizationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(RomanizationError::Unavailable("always down".to_string()))
    }
}

/// Batching tier that loses a line in batch mode but works line by line
#[derive(Debug, Default)]
struct LossyBatchTier {
    batch_calls: AtomicUsize,
}

#[async_trait]
impl RomanizationStrategy for LossyBatchTier {
    fn name(&self) -> &str {
        "lossy-batch"
    }

    fn supports_batch(&self) -> bool {
        true
    }

    async fn convert(&self, text: &str) -> Result<String, RomanizationError> {
        Ok(format!("x:{}", text))
    }

    async fn convert_batch(&self, lines: &[String]) -> Result<Vec<String>, RomanizationError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(lines.iter().skip(1).map(|line| format!("x:{}", line)).collect())
    }
}

fn registry(config: &Config) -> ProviderRegistry {
    ProviderRegistry::new(config, Arc::new(MockTranslator::working()), Arc::new(MockTransliterator::working()))
}

#[tokio::test]
async fn test_chain_should_fall_through_to_next_tier() {
    let broken = Arc::new(BrokenTier::default());
    let chain = RomanizationChain::new(
        ScriptType::Other,
        vec![broken.clone(), Arc::new(GenericTransliterator::new())],
    );

    assert_eq!(chain.convert("Ñandú").await, "Nandu");
    assert_eq!(broken.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_chain_with_every_tier_failing_should_echo_line() {
    let chain = RomanizationChain::new(ScriptType::Thai, vec![Arc::new(BrokenTier::default())]);
    assert_eq!(chain.convert("สวัสดี").await, "สวัสดี");
}

#[tokio::test]
async fn test_chain_should_not_touch_untranslatable_lines() {
    let broken = Arc::new(BrokenTier::default());
    let chain = RomanizationChain::new(ScriptType::Korean, vec![broken.clone()]);

    let input = common::lines(&["", "♪", "   "]);
    assert_eq!(chain.convert_batch(&input).await, input);
    assert_eq!(chain.convert("").await, "");
    assert_eq!(broken.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_chain_batch_with_misaligned_output_should_retry_per_line() {
    let tier = Arc::new(LossyBatchTier::default());
    let chain = RomanizationChain::new(ScriptType::Arabic, vec![tier.clone()]);

    let input = common::lines(&["a", "", "b"]);
    let output = chain.convert_batch(&input).await;

    assert_eq!(output, vec!["x:a", "", "x:b"]);
    assert_eq!(tier.batch_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_chain_can_handle() {
    let registry = registry(&Config::default());
    let korean = registry.chain(ScriptType::Korean).unwrap();
    assert!(korean.can_handle("사랑 love"));
    assert!(!korean.can_handle("love"));

    let japanese = registry.chain(ScriptType::Japanese).unwrap();
    assert!(japanese.can_handle("漢字"));
    assert!(japanese.can_handle("ひらがな"));
}

#[test]
fn test_registry_local_chains() {
    let registry = registry(&Config::default());
    let expected = [
        (ScriptType::Japanese, vec!["japanese-analyzer", "generic"]),
        (ScriptType::Chinese, vec!["pinyin", "generic"]),
        (ScriptType::Korean, vec!["revised-romanization", "generic"]),
        (ScriptType::Cyrillic, vec!["cyrillic-table", "generic"]),
        (ScriptType::Thai, vec!["generic"]),
        (ScriptType::Other, vec!["generic"]),
    ];

    for (script, tiers) in expected {
        assert_eq!(registry.chain(script).unwrap().tier_names(), tiers, "{}", script);
    }
}

#[test]
fn test_registry_indic_chains_prefer_remote_for_weak_local_scripts() {
    let registry = registry(&Config::default());
    assert_eq!(
        registry.chain(ScriptType::Malayalam).unwrap().tier_names(),
        vec!["mock-transliterator(Malayalam->IAST)", "malayalam-iast", "generic"]
    );
    assert_eq!(registry.chain(ScriptType::Hebrew).unwrap().tier_names(), vec!["mock-phonetic(iw)", "generic"]);
    assert_eq!(registry.chain(ScriptType::Devanagari).unwrap().tier_names(), vec!["devanagari-iast", "generic"]);
}

#[test]
fn test_registry_with_aksharamukha_disabled_should_keep_google_tiers() {
    let mut config = Config::default();
    config.services.aksharamukha.enabled = false;
    let registry = registry(&config);

    assert_eq!(
        registry.chain(ScriptType::Arabic).unwrap().tier_names(),
        vec!["mock-phonetic(ar)", "arabic-local"]
    );
}

#[tokio::test]
async fn test_registry_romanize_lines_uses_local_romanizers() {
    let registry = registry(&Config::default());

    let cyrillic = registry.romanize_lines(ScriptType::Cyrillic, &common::lines(&["Привет, мир!", ""])).await;
    assert_eq!(cyrillic, vec!["Privet, mir!", ""]);

    let korean = registry.romanize_lines(ScriptType::Korean, &common::lines(&["안녕하세요"])).await;
    assert_eq!(korean, vec!["annyeonghaseyo"]);
}

#[tokio::test]
async fn test_registry_romanize_lines_uses_remote_tier_for_arabic() {
    let translator = MockTranslator::working();
    let log = translator.call_log();
    let registry = ProviderRegistry::new(
        &Config::default(),
        Arc::new(translator),
        Arc::new(MockTransliterator::working()),
    );

    let output = registry.romanize_lines(ScriptType::Arabic, &common::lines(&["مرحبا", "شكرا"])).await;
    assert_eq!(output, vec!["rom:مرحبا", "rom:شكرا"]);
    // One batched request for both lines
    assert_eq!(log.count(), 1);
}

#[tokio::test]
async fn test_registry_arabic_should_reach_local_tier_when_remote_fails() {
    let registry = ProviderRegistry::new(
        &Config::default(),
        Arc::new(MockTranslator::failing()),
        Arc::new(MockTransliterator::failing()),
    );

    let output = registry.romanize_lines(ScriptType::Arabic, &common::lines(&["مَرْحَبًا"])).await;
    assert!(!output[0].is_empty());
    assert_ne!(output[0], "مَرْحَبًا");
    assert!(!output[0].contains('\u{064E}'));
}

#[tokio::test]
async fn test_registry_romanize_line_mixed_scripts() {
    let registry = registry(&Config::default());
    assert_eq!(registry.romanize_line("안녕 Привет").await, "annyeong Privet");
    assert_eq!(registry.romanize_line("♪").await, "♪");
}

#[tokio::test]
async fn test_registry_romanize_line_should_cache_by_text() {
    let translator = MockTranslator::working();
    let log = translator.call_log();
    let registry = ProviderRegistry::new(
        &Config::default(),
        Arc::new(translator),
        Arc::new(MockTransliterator::working()),
    );

    let first = registry.romanize_line("שלום").await;
    let second = registry.romanize_line("שלום").await;
    assert_eq!(first, second);
    assert_eq!(log.count(), 1);
}

#[tokio::test]
async fn test_registry_failed_japanese_init_should_be_reported_and_not_retried() {
    let mut config = Config::default();
    config.romanization.japanese_dictionary = Some(PathBuf::from("/nonexistent/readings.tsv"));
    let registry = registry(&config);

    let analyzer_status = |registry: &ProviderRegistry| {
        registry
            .availability()
            .into_iter()
            .find(|status| status.tier == "japanese-analyzer")
            .map(|status| status.availability)
    };
    assert_eq!(analyzer_status(&registry), Some(Availability::Ready));

    let lines = common::lines(&["こんにちは"]);
    let first = registry.romanize_lines(ScriptType::Japanese, &lines).await;
    let _ = registry.romanize_lines(ScriptType::Japanese, &lines).await;

    // Generic tier took over
    assert!(first[0].is_ascii());
    assert!(matches!(analyzer_status(&registry), Some(Availability::Disabled(_))));
    assert_eq!(registry.japanese_analyzer().load_attempts(), 1);
}
