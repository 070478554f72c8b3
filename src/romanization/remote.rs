/*!
 * Romanization tiers backed by remote services.
 *
 * - `GooglePhonetic`: the translation service's phonetic reading (`dt=rm`)
 * - `AksharamukhaStrategy`: script-to-script transliteration
 *
 * Both batch by joining lines with newlines and reject responses that do not
 * keep one line per input line. Chunking a batch under the request ceiling is
 * left to the chain, so each chunk can be paced like any other request.
 */

use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use crate::errors::{ProviderError, RomanizationError};
use crate::providers::{RemoteTranslator, RemoteTransliterator, TranslationRequest};
use crate::translation::chunking::split_response_lines;
use super::RomanizationStrategy;

/// Target language sent with phonetic-only requests; the reading is of the source
const PHONETIC_TARGET: &str = "en";

fn check_line_count(lines: Vec<String>, expected: usize) -> Result<Vec<String>, RomanizationError> {
    if lines.len() != expected {
        return Err(ProviderError::LineCountMismatch { expected, actual: lines.len() }.into());
    }
    Ok(lines)
}

/// Phonetic romanization from the translation service
#[derive(Debug, Clone)]
pub struct GooglePhonetic {
    translator: Arc<dyn RemoteTranslator>,
    source_language: String,
    name: String,
}

impl GooglePhonetic {
    /// Create the tier for one source language
    pub fn new(translator: Arc<dyn RemoteTranslator>, source_language: impl Into<String>) -> Self {
        let source_language = source_language.into();
        Self {
            name: format!("{}-phonetic({})", translator.name(), source_language),
            translator,
            source_language,
        }
    }

    async fn request(&self, text: &str) -> Result<String, RomanizationError> {
        let request = TranslationRequest::new(text, PHONETIC_TARGET)
            .source_language(&self.source_language)
            .with_romanization(true);

        let response = self.translator.translate(&request).await?;
        match response.romanized {
            Some(romanized) if !romanized.trim().is_empty() => Ok(romanized),
            _ => Err(RomanizationError::Unavailable(format!(
                "{} returned no romanization block",
                self.translator.name()
            ))),
        }
    }
}

#[async_trait]
impl RomanizationStrategy for GooglePhonetic {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports_batch(&self) -> bool {
        true
    }

    fn is_remote(&self) -> bool {
        true
    }

    fn batch_limit(&self) -> Option<usize> {
        Some(self.translator.max_chars())
    }

    async fn convert(&self, text: &str) -> Result<String, RomanizationError> {
        self.request(text).await
    }

    async fn convert_batch(&self, lines: &[String]) -> Result<Vec<String>, RomanizationError> {
        debug!("{}: requesting {} lines", self.name, lines.len());
        let romanized = self.request(&lines.join("\n")).await?;
        check_line_count(split_response_lines(&romanized, lines.len()), lines.len())
    }
}

/// Transliteration between two Aksharamukha schemes
#[derive(Debug, Clone)]
pub struct AksharamukhaStrategy {
    client: Arc<dyn RemoteTransliterator>,
    source_scheme: String,
    target_scheme: String,
    name: String,
}

impl AksharamukhaStrategy {
    /// Create the tier for a source/target scheme pair, e.g. `Tamil` to `IAST`
    pub fn new(
        client: Arc<dyn RemoteTransliterator>,
        source_scheme: impl Into<String>,
        target_scheme: impl Into<String>,
    ) -> Self {
        let source_scheme = source_scheme.into();
        let target_scheme = target_scheme.into();
        Self {
            name: format!("{}({}->{})", client.name(), source_scheme, target_scheme),
            client,
            source_scheme,
            target_scheme,
        }
    }
}

#[async_trait]
impl RomanizationStrategy for AksharamukhaStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports_batch(&self) -> bool {
        true
    }

    fn is_remote(&self) -> bool {
        true
    }

    async fn convert(&self, text: &str) -> Result<String, RomanizationError> {
        let output = self.client.transliterate(&self.source_scheme, &self.target_scheme, text).await?;
        Ok(output.trim_end_matches(['\r', '\n']).to_string())
    }

    async fn convert_batch(&self, lines: &[String]) -> Result<Vec<String>, RomanizationError> {
        let output = self
            .client
            .transliterate(&self.source_scheme, &self.target_scheme, &lines.join("\n"))
            .await?;
        check_line_count(split_response_lines(&output, lines.len()), lines.len())
    }
}
