/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock services that simulate different behaviors:
 * - `MockTranslator::working()` - Always succeeds, tagging every line
 * - `MockTranslator::failing()` - Always fails with an error
 * - `MockTranslator::rate_limited()` - Fails the way a blocked Google request does
 * - `MockTranslator::dropping_last_line()` - Loses one line per response
 *
 * Every call is recorded with a timestamp so tests can check ordering,
 * payloads and the spacing between consecutive requests.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crate::errors::ProviderError;
use super::{RemoteTranslator, RemoteTransliterator, TranslationRequest, TranslationResponse};

/// Behavior mode for the mock services
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Succeeds but never returns a romanization block
    WithoutRomanization,
    /// Succeeds with one line missing from the output
    DropLastLine,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an API error
    Failing,
    /// Always fails with a rate-limit error
    RateLimited,
}

/// A recorded call
#[derive(Debug, Clone)]
pub struct MockCall {
    /// Text sent
    pub text: String,
    /// Source language or scheme
    pub source: String,
    /// Target language or scheme
    pub target: String,
    /// Whether a romanization was requested
    pub include_romanization: bool,
    /// When the call arrived
    pub at: Instant,
}

impl MockCall {
    /// Lines carried by this call
    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }
}

/// Shared call log
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl CallLog {
    fn record(&self, call: MockCall) {
        self.calls.lock().push(call);
    }

    /// Snapshot of every call so far
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    /// Number of calls so far
    pub fn count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Every line sent across all calls, in order
    pub fn sent_lines(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .flat_map(|call| call.text.split('\n').map(str::to_string).collect::<Vec<_>>())
            .collect()
    }
}

fn tag_lines(text: &str, tag: &str) -> String {
    text.split('\n')
        .map(|line| format!("{}{}", tag, line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn drop_last_line(text: &str) -> String {
    let mut lines: Vec<&str> = text.split('\n').collect();
    lines.pop();
    lines.join("\n")
}

/// Mock translator
#[derive(Debug, Clone)]
pub struct MockTranslator {
    name: String,
    behavior: MockBehavior,
    max_chars: usize,
    request_count: Arc<AtomicUsize>,
    log: CallLog,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            name: "mock".to_string(),
            behavior,
            max_chars: 500,
            request_count: Arc::new(AtomicUsize::new(0)),
            log: CallLog::default(),
        }
    }

    /// Create a working mock translator
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock translator
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that fails like a blocked request
    pub fn rate_limited() -> Self {
        Self::new(MockBehavior::RateLimited)
    }

    /// Create a mock that never returns romanization
    pub fn without_romanization() -> Self {
        Self::new(MockBehavior::WithoutRomanization)
    }

    /// Create a mock that loses the last line of every response
    pub fn dropping_last_line() -> Self {
        Self::new(MockBehavior::DropLastLine)
    }

    /// Set the request ceiling
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Set the name used in logs
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Handle on the call log, shared with clones
    pub fn call_log(&self) -> CallLog {
        self.log.clone()
    }

    /// The translation this mock produces for one line
    pub fn expected_translation(line: &str, target_language: &str) -> String {
        format!("[{}] {}", target_language, line)
    }

    /// The romanization this mock produces for one line
    pub fn expected_romanization(line: &str) -> String {
        format!("rom:{}", line)
    }
}

#[async_trait]
impl RemoteTranslator for MockTranslator {
    fn name(&self) -> &str {
        &self.name
    }

    fn max_chars(&self) -> usize {
        self.max_chars
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResponse, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.log.record(MockCall {
            text: request.text.clone(),
            source: request.source_language.clone(),
            target: request.target_language.clone(),
            include_romanization: request.include_romanization,
            at: Instant::now(),
        });

        let translated = tag_lines(&request.text, &format!("[{}] ", request.target_language));
        let romanized = request
            .include_romanization
            .then(|| tag_lines(&request.text, "rom:"));

        match self.behavior {
            MockBehavior::Working => Ok(TranslationResponse { translated, romanized }),
            MockBehavior::WithoutRomanization => Ok(TranslationResponse { translated, romanized: None }),
            MockBehavior::DropLastLine => Ok(TranslationResponse {
                translated: drop_last_line(&translated),
                romanized: romanized.map(|r| drop_last_line(&r)),
            }),
            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        status_code: 503,
                        message: "Simulated intermittent failure".to_string(),
                    })
                } else {
                    Ok(TranslationResponse { translated, romanized })
                }
            }
            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated failure".to_string(),
            }),
            MockBehavior::RateLimited => Err(ProviderError::RateLimitExceeded("redirect to block page".to_string())),
        }
    }
}

/// Mock transliterator
#[derive(Debug, Clone)]
pub struct MockTransliterator {
    behavior: MockBehavior,
    log: CallLog,
}

impl MockTransliterator {
    /// Create a new mock transliterator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            log: CallLog::default(),
        }
    }

    /// Create a working mock transliterator
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock transliterator
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that loses the last line of every response
    pub fn dropping_last_line() -> Self {
        Self::new(MockBehavior::DropLastLine)
    }

    /// Handle on the call log, shared with clones
    pub fn call_log(&self) -> CallLog {
        self.log.clone()
    }

    /// The transliteration this mock produces for one line
    pub fn expected_output(line: &str, target_scheme: &str) -> String {
        format!("{}:{}", target_scheme, line)
    }
}

#[async_trait]
impl RemoteTransliterator for MockTransliterator {
    fn name(&self) -> &str {
        "mock-transliterator"
    }

    async fn transliterate(&self, source_scheme: &str, target_scheme: &str, text: &str) -> Result<String, ProviderError> {
        self.log.record(MockCall {
            text: text.to_string(),
            source: source_scheme.to_string(),
            target: target_scheme.to_string(),
            include_romanization: true,
            at: Instant::now(),
        });

        let output = tag_lines(text, &format!("{}:", target_scheme));
        match self.behavior {
            MockBehavior::Failing | MockBehavior::RateLimited => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated failure".to_string(),
            }),
            MockBehavior::DropLastLine => Ok(drop_last_line(&output)),
            _ => Ok(output),
        }
    }
}
