use async_trait::async_trait;
use pinyin::ToPinyin;

use crate::errors::RomanizationError;
use super::RomanizationStrategy;

/// Convert Han characters to tone-marked pinyin, one space between syllables.
///
/// Characters without a reading are kept as they are.
pub fn to_pinyin(text: &str) -> String {
    let mut output = String::with_capacity(text.len() * 3);
    let mut after_syllable = false;

    for c in text.chars() {
        match c.to_pinyin() {
            Some(syllable) => {
                if !output.is_empty() && !output.ends_with(char::is_whitespace) {
                    output.push(' ');
                }
                output.push_str(syllable.with_tone());
                after_syllable = true;
            }
            None => {
                if after_syllable && c.is_alphanumeric() {
                    output.push(' ');
                }
                output.push(c);
                after_syllable = false;
            }
        }
    }

    output
}

/// Pinyin romanizer
#[derive(Debug, Default, Clone)]
pub struct PinyinRomanizer;

#[async_trait]
impl RomanizationStrategy for PinyinRomanizer {
    fn name(&self) -> &str {
        "pinyin"
    }

    async fn convert(&self, text: &str) -> Result<String, RomanizationError> {
        Ok(to_pinyin(text))
    }
}
