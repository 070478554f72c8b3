use async_trait::async_trait;

use crate::errors::RomanizationError;
use super::RomanizationStrategy;
use super::generic::GenericTransliterator;

/// Harakat, superscript alef and Quranic annotation marks
fn is_tashkeel(c: char) -> bool {
    matches!(c, '\u{0610}'..='\u{061A}' | '\u{064B}'..='\u{065F}' | '\u{0670}' | '\u{06D6}'..='\u{06ED}')
}

/// Remove vowel diacritics from Arabic text
pub fn remove_tashkeel(text: &str) -> String {
    text.chars().filter(|c| !is_tashkeel(*c)).collect()
}

/// Offline Arabic romanization: consonant skeleton only, no vowels
#[derive(Debug, Default, Clone)]
pub struct ArabicLocal;

#[async_trait]
impl RomanizationStrategy for ArabicLocal {
    fn name(&self) -> &str {
        "arabic-local"
    }

    async fn convert(&self, text: &str) -> Result<String, RomanizationError> {
        Ok(GenericTransliterator::transliterate(&remove_tashkeel(text)))
    }
}
