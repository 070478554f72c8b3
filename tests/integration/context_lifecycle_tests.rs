/*!
 * Tests for song switches, resets and stale results.
 */

use std::time::Duration;

use sly_lyrics::app_config::PipelineConfig;
use sly_lyrics::providers::mock::{MockTranslator, MockTransliterator};
use sly_lyrics::translation::LyricsPipeline;

use crate::common::{fast_settings, init_test_logging, lines, mock_pipeline, working_pipeline};

/// Pipeline whose primary sends one line per request with a long pause between requests
fn slow_pipeline(primary: &MockTranslator) -> LyricsPipeline {
    let settings = PipelineConfig {
        chunk_delay_ms: 300,
        ..PipelineConfig::default()
    };
    mock_pipeline(primary.clone(), MockTranslator::working(), MockTransliterator::working(), &settings)
}

#[tokio::test]
async fn test_reset_during_delay_should_stop_requests_and_skip_cache() {
    init_test_logging();
    let primary = MockTranslator::working().with_max_chars(8);
    let pipeline = slow_pipeline(&primary);
    let input = lines(&["первая", "вторая", "третья"]);

    let task = {
        let pipeline = pipeline.clone();
        let input = input.clone();
        tokio::spawn(async move { pipeline.process(&input, "en").await })
    };

    // The first request goes out at once, the second waits for the delay
    tokio::time::sleep(Duration::from_millis(100)).await;
    pipeline.reset_context(None);

    let result = task.await.unwrap();
    assert_eq!(primary.call_log().count(), 1);
    assert_eq!(result.translated, vec!["[en] первая", "вторая", "третья"]);
    // Romanization is local and still complete
    assert_eq!(result.romanized, vec!["pervaya", "vtoraya", "tretya"]);
    assert!(pipeline.context().cache().is_empty());
}

#[tokio::test]
async fn test_reset_during_delay_should_skip_remote_romanization() {
    init_test_logging();
    let primary = MockTranslator::working().with_max_chars(8);
    let transliterator = MockTransliterator::working();
    let settings = PipelineConfig {
        chunk_delay_ms: 300,
        ..PipelineConfig::default()
    };
    let pipeline = mock_pipeline(primary.clone(), MockTranslator::working(), transliterator.clone(), &settings);
    let input = lines(&["مرحبا", "شكرا", "سلام"]);

    let task = {
        let pipeline = pipeline.clone();
        let input = input.clone();
        tokio::spawn(async move { pipeline.process(&input, "en").await })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    pipeline.reset_context(None);

    let result = task.await.unwrap();
    // Only the first combined request went out
    assert_eq!(primary.call_log().count(), 1);
    assert_eq!(transliterator.call_log().count(), 0);
    assert_eq!(result.translated, vec!["[en] مرحبا", "شكرا", "سلام"]);
    assert_eq!(result.romanized[0], "rom:مرحبا");
    for romanized in &result.romanized[1..] {
        assert!(!romanized.is_empty() && !romanized.starts_with("ISO:"), "{}", romanized);
    }
    assert!(pipeline.context().cache().is_empty());
}

#[tokio::test]
async fn test_switching_song_mid_call_should_discard_old_result() {
    let primary = MockTranslator::working().with_max_chars(8);
    let pipeline = slow_pipeline(&primary);
    let song_a = lines(&["первая", "вторая"]);
    let song_b = lines(&["Hello"]);

    let task = {
        let pipeline = pipeline.clone();
        let song_a = song_a.clone();
        tokio::spawn(async move { pipeline.process(&song_a, "en").await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    let result_b = pipeline.process(&song_b, "en").await;
    let result_a = task.await.unwrap();

    assert_eq!(result_b.translated, vec!["[en] Hello"]);
    assert_eq!(result_a.translated[1], "вторая");
    // Only the current song's result is cached
    assert_eq!(pipeline.context().cached("en"), Some(result_b));
}

#[tokio::test]
async fn test_returning_to_previous_song_should_request_again() {
    let (pipeline, primary, _) = working_pipeline();
    let song_a = lines(&["Привет"]);
    let song_b = lines(&["Пока"]);

    pipeline.process(&song_a, "en").await;
    pipeline.process(&song_b, "en").await;
    pipeline.process(&song_a, "en").await;

    assert_eq!(primary.call_log().count(), 3);
}

#[tokio::test]
async fn test_reset_with_subject_should_keep_serving_new_calls() {
    let (pipeline, primary, _) = working_pipeline();
    let song = lines(&["Привет"]);

    let before = pipeline.context().generation();
    pipeline.reset_context(Some(song.as_slice()));
    assert!(pipeline.context().generation() > before);

    pipeline.process(&song, "en").await;
    pipeline.process(&song, "en").await;
    assert_eq!(primary.call_log().count(), 1);
}

#[tokio::test]
async fn test_clear_cache_should_force_new_requests() {
    let primary = MockTranslator::working();
    let pipeline = mock_pipeline(primary.clone(), MockTranslator::working(), MockTransliterator::working(), &fast_settings());
    let song = lines(&["Привет"]);

    pipeline.process(&song, "en").await;
    pipeline.romanize_line("Привет").await;
    assert_eq!(pipeline.registry().line_cache().len(), 1);

    pipeline.clear_cache();
    assert!(pipeline.registry().line_cache().is_empty());

    pipeline.process(&song, "en").await;
    assert_eq!(primary.call_log().count(), 2);
}
