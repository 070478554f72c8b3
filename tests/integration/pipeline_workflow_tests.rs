/*!
 * End-to-end tests of `LyricsPipeline::process` against mock services.
 *
 * Every service is a mock with a shared call log, so the tests check both the
 * result and exactly what went over the wire.
 */

use std::time::Duration;

use sly_lyrics::app_config::PipelineConfig;
use sly_lyrics::providers::mock::{MockTranslator, MockTransliterator};

use crate::common::{fast_settings, init_test_logging, lines, mock_pipeline, working_pipeline};

#[tokio::test]
async fn test_process_blank_line_is_never_sent_and_stays_aligned() {
    let (pipeline, primary, secondary) = working_pipeline();
    let input = lines(&["Hello", "", "World"]);

    let result = pipeline.process(&input, "fr").await;

    assert_eq!(result.len(), 3);
    assert_eq!(result.translated, vec!["[fr] Hello", "", "[fr] World"]);
    assert_eq!(result.romanized[1], "");
    assert_eq!(primary.call_log().sent_lines(), vec!["Hello", "World"]);
    assert_eq!(secondary.call_log().count(), 0);
}

#[tokio::test]
async fn test_process_symbol_only_lines_should_not_call_any_service() {
    let (pipeline, primary, _) = working_pipeline();
    let input = lines(&["♪", "", "...", "  "]);

    let result = pipeline.process(&input, "de").await;

    assert_eq!(result.translated, input);
    assert_eq!(result.romanized, input);
    assert_eq!(primary.call_log().count(), 0);
}

#[tokio::test]
async fn test_process_empty_input_should_give_empty_result() {
    let (pipeline, primary, _) = working_pipeline();
    let result = pipeline.process(&[], "fr").await;
    assert!(result.is_empty());
    assert_eq!(primary.call_log().count(), 0);
}

#[tokio::test]
async fn test_process_local_script_should_translate_only_and_romanize_locally() {
    let (pipeline, primary, _) = working_pipeline();
    let input = lines(&["Привет, мир!", "", "Щука"]);

    let result = pipeline.process(&input, "en").await;

    assert_eq!(result.translated, vec!["[en] Привет, мир!", "", "[en] Щука"]);
    assert_eq!(result.romanized, vec!["Privet, mir!", "", "Shchuka"]);
    let calls = primary.call_log().calls();
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].include_romanization);
}

#[tokio::test]
async fn test_process_remote_script_should_use_one_combined_request() {
    let (pipeline, primary, _) = working_pipeline();
    let input = lines(&["مرحبا", "شكرا"]);

    let result = pipeline.process(&input, "en").await;

    assert_eq!(result.translated, vec!["[en] مرحبا", "[en] شكرا"]);
    assert_eq!(result.romanized, vec!["rom:مرحبا", "rom:شكرا"]);
    let calls = primary.call_log().calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].include_romanization);
}

#[tokio::test]
async fn test_process_combined_without_romanization_block_should_use_local_chain() {
    let primary = MockTranslator::without_romanization();
    let transliterator = MockTransliterator::failing();
    let pipeline = mock_pipeline(primary.clone(), MockTranslator::working(), transliterator, &fast_settings());

    let result = pipeline.process(&lines(&["வணக்கம்"]), "en").await;

    assert_eq!(result.translated, vec!["[en] வணக்கம்"]);
    // Remote transliteration fails too, so the local IAST tier answers
    assert_eq!(result.romanized, vec!["vaṇakkam"]);
}

#[tokio::test]
async fn test_process_combined_without_block_should_try_transliteration_service() {
    let primary = MockTranslator::without_romanization();
    let transliterator = MockTransliterator::working();
    let log = transliterator.call_log();
    let pipeline = mock_pipeline(primary, MockTranslator::working(), transliterator, &fast_settings());

    let result = pipeline.process(&lines(&["வணக்கம்", "நன்றி"]), "en").await;

    assert_eq!(result.romanized, vec!["IAST:வணக்கம்", "IAST:நன்றி"]);
    let calls = log.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!((calls[0].source.as_str(), calls[0].target.as_str()), ("Tamil", "IAST"));
}

#[tokio::test]
async fn test_process_primary_failure_should_fall_back_to_secondary() {
    let primary = MockTranslator::failing();
    let secondary = MockTranslator::working();
    let pipeline = mock_pipeline(primary.clone(), secondary.clone(), MockTransliterator::working(), &fast_settings());
    let input = lines(&["Привет", "мир"]);

    let result = pipeline.process(&input, "fr").await;

    assert_eq!(result.translated, vec!["[fr] Привет", "[fr] мир"]);
    assert_eq!(result.romanized, vec!["Privet", "mir"]);
    assert_eq!(primary.call_log().count(), 1);
    assert_eq!(secondary.call_log().sent_lines(), vec!["Привет", "мир"]);
    // Cached: the result is complete
    assert!(pipeline.context().cached("fr").is_some());
}

#[tokio::test]
async fn test_process_rate_limited_primary_should_fall_back_to_secondary() {
    let secondary = MockTranslator::working();
    let pipeline = mock_pipeline(
        MockTranslator::rate_limited(),
        secondary.clone(),
        MockTransliterator::working(),
        &fast_settings(),
    );

    let result = pipeline.process(&lines(&["Hello"]), "es").await;

    assert_eq!(result.translated, vec!["[es] Hello"]);
    assert_eq!(secondary.call_log().count(), 1);
}

#[tokio::test]
async fn test_process_misaligned_primary_response_should_fall_back_to_secondary() {
    let secondary = MockTranslator::working();
    let pipeline = mock_pipeline(
        MockTranslator::dropping_last_line(),
        secondary.clone(),
        MockTransliterator::working(),
        &fast_settings(),
    );

    let result = pipeline.process(&lines(&["Привет", "мир"]), "fr").await;

    assert_eq!(result.translated, vec!["[fr] Привет", "[fr] мир"]);
    assert_eq!(secondary.call_log().count(), 1);
}

#[tokio::test]
async fn test_process_total_failure_should_pass_lines_through() {
    init_test_logging();
    let primary = MockTranslator::failing();
    let secondary = MockTranslator::failing();
    let pipeline = mock_pipeline(primary.clone(), secondary.clone(), MockTransliterator::working(), &fast_settings());
    let input = lines(&["Привет", "", "мир"]);

    let result = pipeline.process(&input, "fr").await;

    assert_eq!(result.translated, input);
    // Romanization does not depend on the translators for Cyrillic
    assert_eq!(result.romanized, vec!["Privet", "", "mir"]);

    // Nothing cached, so a second call tries again
    assert!(pipeline.context().cached("fr").is_none());
    pipeline.process(&input, "fr").await;
    assert_eq!(primary.call_log().count(), 2);
    assert_eq!(secondary.call_log().count(), 2);
}

#[tokio::test]
async fn test_process_secondary_should_split_to_its_smaller_ceiling() {
    let primary = MockTranslator::failing().with_max_chars(100);
    let secondary = MockTranslator::working().with_max_chars(12);
    let pipeline = mock_pipeline(primary.clone(), secondary.clone(), MockTransliterator::working(), &fast_settings());
    let input = lines(&["aaaa aaaa", "bbbb bbbb", "cccc cccc"]);

    let result = pipeline.process(&input, "fr").await;

    assert_eq!(result.translated, vec!["[fr] aaaa aaaa", "[fr] bbbb bbbb", "[fr] cccc cccc"]);
    assert_eq!(primary.call_log().count(), 1);
    let sub_chunks: Vec<usize> = secondary.call_log().calls().iter().map(|call| call.lines().len()).collect();
    assert_eq!(sub_chunks, vec![1, 1, 1]);
}

#[tokio::test]
async fn test_process_secondary_error_should_pass_rest_of_chunk_through() {
    let primary = MockTranslator::failing().with_max_chars(100);
    let secondary = MockTranslator::failing().with_max_chars(12);
    let pipeline = mock_pipeline(primary, secondary.clone(), MockTransliterator::working(), &fast_settings());
    let input = lines(&["aaaa aaaa", "bbbb bbbb", "cccc cccc"]);

    let result = pipeline.process(&input, "fr").await;

    assert_eq!(result.translated, input);
    // The first sub-chunk error ends the attempt for the whole chunk
    assert_eq!(secondary.call_log().count(), 1);
}

#[tokio::test]
async fn test_process_secondary_misalignment_should_only_skip_that_sub_chunk() {
    let primary = MockTranslator::failing().with_max_chars(100);
    let secondary = MockTranslator::dropping_last_line().with_max_chars(20);
    let pipeline = mock_pipeline(primary, secondary.clone(), MockTransliterator::working(), &fast_settings());
    // Sub-chunks: [a, b] then [c, d]; dropping a line breaks both
    let input = lines(&["aaaa aaaa", "bbbb bbbb", "cccc cccc", "dddd dddd"]);

    let result = pipeline.process(&input, "fr").await;

    assert_eq!(result.translated, input);
    assert_eq!(secondary.call_log().count(), 2);
}

#[tokio::test]
async fn test_process_chunks_should_respect_ceiling_and_order() {
    let primary = MockTranslator::working().with_max_chars(25);
    let pipeline = mock_pipeline(primary.clone(), MockTranslator::working(), MockTransliterator::working(), &fast_settings());
    let input: Vec<String> = (1..=9).map(|i| format!("Строка номер {}", i)).collect();

    let result = pipeline.process(&input, "en").await;

    let calls = primary.call_log().calls();
    assert!(calls.len() > 1);
    for call in &calls {
        assert!(call.text.encode_utf16().count() <= 25, "chunk too long: {:?}", call.text);
    }
    assert_eq!(primary.call_log().sent_lines(), input);
    for (original, translated) in input.iter().zip(&result.translated) {
        assert_eq!(translated, &MockTranslator::expected_translation(original, "en"));
    }
}

#[tokio::test]
async fn test_process_should_space_requests_by_chunk_delay() {
    let primary = MockTranslator::working().with_max_chars(10);
    let settings = PipelineConfig {
        chunk_delay_ms: 100,
        ..PipelineConfig::default()
    };
    let pipeline = mock_pipeline(primary.clone(), MockTranslator::working(), MockTransliterator::working(), &settings);
    let input = lines(&["первая", "вторая", "третья"]);

    pipeline.process(&input, "en").await;

    let calls = primary.call_log().calls();
    assert_eq!(calls.len(), 3);
    for pair in calls.windows(2) {
        let gap = pair[1].at.duration_since(pair[0].at);
        assert!(gap >= Duration::from_millis(100), "requests only {:?} apart", gap);
    }
}

#[tokio::test]
async fn test_process_remote_romanization_should_share_chunk_delay() {
    let primary = MockTranslator::without_romanization();
    let transliterator = MockTransliterator::working();
    let settings = PipelineConfig {
        chunk_delay_ms: 40,
        ..PipelineConfig::default()
    };
    let pipeline = mock_pipeline(primary.clone(), MockTranslator::working(), transliterator.clone(), &settings);

    let result = pipeline.process(&lines(&["مرحبا", "شكرا"]), "en").await;

    assert_eq!(result.romanized, vec!["ISO:مرحبا", "ISO:شكرا"]);
    // Translation, phonetic batch, then one phonetic retry per line
    let calls = primary.call_log().calls();
    assert_eq!(calls.len(), 4);
    for pair in calls.windows(2) {
        let gap = pair[1].at.duration_since(pair[0].at);
        assert!(gap >= Duration::from_millis(40), "requests only {:?} apart", gap);
    }
    assert_eq!(transliterator.call_log().count(), 2);
}

#[tokio::test]
async fn test_process_rate_limited_primary_should_romanize_locally() {
    let primary = MockTranslator::rate_limited();
    let transliterator = MockTransliterator::working();
    let pipeline = mock_pipeline(primary.clone(), MockTranslator::working(), transliterator.clone(), &fast_settings());
    let input = lines(&["مرحبا", "شكرا", "سلام", "حبيبي"]);

    let result = pipeline.process(&input, "en").await;

    assert_eq!(result.translated[0], "[en] مرحبا");
    assert_eq!(primary.call_log().count(), 1);
    assert_eq!(transliterator.call_log().count(), 0);
    for (romanized, original) in result.romanized.iter().zip(&input) {
        assert!(!romanized.starts_with("rom:") && !romanized.starts_with("ISO:"), "{}", romanized);
        assert_ne!(romanized, original);
    }
}

#[tokio::test]
async fn test_process_second_call_should_be_served_from_cache() {
    let (pipeline, primary, _) = working_pipeline();
    let input = lines(&["사랑해", "", "보고 싶어"]);

    let first = pipeline.process(&input, "en").await;
    let calls_after_first = primary.call_log().count();
    let second = pipeline.process(&input, "en").await;

    assert_eq!(first, second);
    assert_eq!(primary.call_log().count(), calls_after_first);
    assert_eq!(first.romanized[0], "saranghae");

    // Another language is a separate entry
    pipeline.process(&input, "fr").await;
    assert!(primary.call_log().count() > calls_after_first);
}

#[tokio::test]
async fn test_process_with_cache_disabled_should_request_every_time() {
    let primary = MockTranslator::working();
    let settings = PipelineConfig {
        cache_enabled: false,
        ..fast_settings()
    };
    let pipeline = mock_pipeline(primary.clone(), MockTranslator::working(), MockTransliterator::working(), &settings);
    let input = lines(&["Привет"]);

    pipeline.process(&input, "en").await;
    pipeline.process(&input, "en").await;

    assert_eq!(primary.call_log().count(), 2);
}

#[tokio::test]
async fn test_romanize_line_through_pipeline() {
    let (pipeline, _, _) = working_pipeline();
    assert_eq!(pipeline.romanize_line("사랑해 baby").await, "saranghae baby");
}
