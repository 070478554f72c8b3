/*!
 * Provider implementations for the remote services.
 *
 * This module contains client implementations for the services the pipeline talks to:
 * - Google: translation plus phonetic romanization in one request (primary)
 * - MyMemory: translation only (secondary)
 * - Aksharamukha: script-to-script transliteration
 * - Mock: test doubles with call recording and forced failures
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// A translation request sent to a remote translator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    /// Newline-joined source text
    pub text: String,
    /// Source language code, `auto` for detection
    pub source_language: String,
    /// Target language code
    pub target_language: String,
    /// Ask for a romanization of the source alongside the translation
    pub include_romanization: bool,
}

impl TranslationRequest {
    /// Create a translation-only request with automatic source detection
    pub fn new(text: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_language: "auto".to_string(),
            target_language: target_language.into(),
            include_romanization: false,
        }
    }

    /// Set the source language
    pub fn source_language(mut self, source_language: impl Into<String>) -> Self {
        self.source_language = source_language.into();
        self
    }

    /// Ask for a romanization block in the response
    pub fn with_romanization(mut self, include_romanization: bool) -> Self {
        self.include_romanization = include_romanization;
        self
    }
}

/// The useful part of a translator response
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslationResponse {
    /// Newline-joined translation
    pub translated: String,
    /// Newline-joined romanization of the source, when the service produced one
    pub romanized: Option<String>,
}

/// Common trait for remote translators
///
/// Implementations must not retry internally; the pipeline decides what happens
/// after a failure.
#[async_trait]
pub trait RemoteTranslator: Send + Sync + Debug {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Largest request the service accepts, in UTF-16 code units
    fn max_chars(&self) -> usize;

    /// Translate a newline-joined chunk of lines
    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResponse, ProviderError>;
}

/// Common trait for remote script-to-script transliterators
#[async_trait]
pub trait RemoteTransliterator: Send + Sync + Debug {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Transliterate newline-joined text from one scheme to another
    async fn transliterate(&self, source_scheme: &str, target_scheme: &str, text: &str) -> Result<String, ProviderError>;
}

pub mod google;
pub mod mymemory;
pub mod aksharamukha;
pub mod mock;
