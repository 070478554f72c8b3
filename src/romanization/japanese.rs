/*!
 * Japanese romanization.
 *
 * Kanji readings come from `ib_romaji`'s Hepburn romanizer, which matches the
 * longest dictionary word starting at a kanji. Kana runs are converted with
 * `wana_kana`. A user reading file (`surface<TAB>reading`) can override
 * either, and a kanji neither knows falls back to a generic transliteration.
 *
 * The romanizer and the reading file are loaded lazily on first use. Loading
 * happens exactly once: concurrent callers await the same initialization, and
 * a failure is kept so later calls fail fast instead of loading again.
 */

use async_trait::async_trait;
use deunicode::deunicode_char;
use ib_romaji::HepburnRomanizer;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::OnceCell;
use wana_kana::ConvertJapanese;

use crate::errors::RomanizationError;
use crate::script_detection::{CharScript, char_script};
use super::RomanizationStrategy;
use super::generic::collapse_spaces;

/// Surface form to kana reading
#[derive(Debug, Default, Clone)]
pub struct ReadingDictionary {
    entries: HashMap<String, String>,
    longest_entry: usize,
}

impl ReadingDictionary {
    /// Parse `surface<TAB>reading` lines; blank lines and `#` comments are skipped
    pub fn parse(content: &str) -> Self {
        let mut dictionary = Self::default();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((surface, reading)) = line.split_once('\t') else {
                continue;
            };
            let (surface, reading) = (surface.trim(), reading.trim());
            if surface.is_empty() || reading.is_empty() {
                continue;
            }
            dictionary.insert(surface, reading);
        }
        dictionary
    }

    /// Add one entry
    pub fn insert(&mut self, surface: &str, reading: &str) {
        self.longest_entry = self.longest_entry.max(surface.chars().count());
        self.entries.insert(surface.to_string(), reading.to_string());
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dictionary has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Longest entry at the start of `text`: (bytes consumed, reading)
    fn longest_match(&self, text: &str) -> Option<(usize, &str)> {
        if self.entries.is_empty() {
            return None;
        }
        let ends: Vec<usize> = text
            .char_indices()
            .map(|(idx, c)| idx + c.len_utf8())
            .take(self.longest_entry)
            .collect();
        ends.into_iter()
            .rev()
            .find_map(|end| self.entries.get(&text[..end]).map(|reading| (end, reading.as_str())))
    }
}

/// Loaded state of the analyzer
pub struct JapaneseReader {
    romanizer: HepburnRomanizer,
    overrides: ReadingDictionary,
}

impl std::fmt::Debug for JapaneseReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JapaneseReader")
            .field("overrides", &self.overrides.len())
            .finish_non_exhaustive()
    }
}

impl JapaneseReader {
    /// Build the romanizer with the given reading overrides
    pub fn new(overrides: ReadingDictionary) -> Self {
        Self {
            romanizer: HepburnRomanizer::default(),
            overrides,
        }
    }

    /// Longest word reading at the start of `text`: (bytes consumed, romaji)
    fn word_reading(&self, text: &str) -> Option<(usize, String)> {
        let mut best: Option<(usize, String)> = None;
        let _ = self.romanizer.romanize_and_try_for_each(text, |len, romaji| {
            let longer = best.as_ref().is_none_or(|(best_len, _)| len > *best_len);
            if len > 0 && longer && text.is_char_boundary(len) && !romaji.is_empty() {
                best = Some((len, romaji.to_string()));
            }
            None::<()>
        });
        best
    }

    /// Romanize one line
    pub fn romanize(&self, text: &str) -> String {
        let mut output = String::with_capacity(text.len() * 2);
        let mut kana = String::new();
        let mut rest = text;

        while let Some(c) = rest.chars().next() {
            if let Some((consumed, reading)) = self.overrides.longest_match(rest) {
                flush_kana(&mut kana, &mut output);
                push_word(&mut output, &reading.to_romaji());
                rest = &rest[consumed..];
                continue;
            }

            if char_script(c) == CharScript::Han {
                flush_kana(&mut kana, &mut output);
                match self.word_reading(rest) {
                    Some((consumed, romaji)) => {
                        push_word(&mut output, &romaji);
                        rest = &rest[consumed..];
                        continue;
                    }
                    None => {
                        if let Some(ascii) = deunicode_char(c) {
                            push_word(&mut output, ascii.trim());
                        }
                    }
                }
            } else {
                kana.push(c);
            }
            rest = &rest[c.len_utf8()..];
        }
        flush_kana(&mut kana, &mut output);

        collapse_spaces(output.trim())
    }
}

/// Lazily initialized Japanese analyzer
#[derive(Debug, Default)]
pub struct JapaneseAnalyzer {
    dictionary_path: Option<PathBuf>,
    reader: OnceCell<Result<Arc<JapaneseReader>, String>>,
    load_attempts: AtomicUsize,
}

impl JapaneseAnalyzer {
    /// Create an analyzer; the reading file at `dictionary_path` is optional
    pub fn new(dictionary_path: Option<PathBuf>) -> Self {
        Self {
            dictionary_path,
            reader: OnceCell::new(),
            load_attempts: AtomicUsize::new(0),
        }
    }

    /// Number of times initialization actually ran
    pub fn load_attempts(&self) -> usize {
        self.load_attempts.load(Ordering::SeqCst)
    }

    /// `None` before first use, then whether initialization succeeded
    pub fn initialization_status(&self) -> Option<Result<(), String>> {
        self.reader.get().map(|result| result.as_ref().map(|_| ()).map_err(Clone::clone))
    }

    /// Run initialization now if it has not run yet
    pub async fn initialize(&self) -> Result<(), RomanizationError> {
        self.reader().await.map(|_| ())
    }

    async fn reader(&self) -> Result<Arc<JapaneseReader>, RomanizationError> {
        let result = self.reader.get_or_init(|| self.load()).await;
        result.clone().map_err(RomanizationError::Initialization)
    }

    async fn load(&self) -> Result<Arc<JapaneseReader>, String> {
        self.load_attempts.fetch_add(1, Ordering::SeqCst);

        let overrides = match &self.dictionary_path {
            None => ReadingDictionary::default(),
            Some(path) => match tokio::fs::read_to_string(path).await {
                Ok(content) => {
                    let dictionary = ReadingDictionary::parse(&content);
                    info!(
                        "Loaded {} Japanese reading overrides from {}",
                        dictionary.len(),
                        path.display()
                    );
                    dictionary
                }
                Err(e) => {
                    warn!("Japanese analyzer unavailable: {}: {}", path.display(), e);
                    return Err(format!("Failed to read {}: {}", path.display(), e));
                }
            },
        };

        debug!("Building the Japanese romanizer");
        Ok(Arc::new(JapaneseReader::new(overrides)))
    }
}

fn push_word(output: &mut String, word: &str) {
    if word.is_empty() {
        return;
    }
    if !output.is_empty() && !output.ends_with(char::is_whitespace) {
        output.push(' ');
    }
    output.push_str(word);
}

fn flush_kana(kana: &mut String, output: &mut String) {
    if !kana.is_empty() {
        push_word(output, &kana.as_str().to_romaji());
        kana.clear();
    }
}

#[async_trait]
impl RomanizationStrategy for JapaneseAnalyzer {
    fn name(&self) -> &str {
        "japanese-analyzer"
    }

    async fn convert(&self, text: &str) -> Result<String, RomanizationError> {
        let reader = self.reader().await?;
        Ok(reader.romanize(text))
    }
}
