use async_trait::async_trait;
use deunicode::deunicode_char;

use crate::errors::RomanizationError;
use super::RomanizationStrategy;

/// Catch-all transliteration to ASCII, the lowest tier of every chain
#[derive(Debug, Default, Clone)]
pub struct GenericTransliterator;

impl GenericTransliterator {
    /// Create the transliterator
    pub fn new() -> Self {
        Self
    }

    /// Transliterate, keeping characters that have no ASCII form
    pub fn transliterate(text: &str) -> String {
        let mut output = String::with_capacity(text.len());
        for c in text.chars() {
            if c.is_ascii() {
                output.push(c);
                continue;
            }
            match deunicode_char(c) {
                Some(ascii) if !ascii.is_empty() => output.push_str(ascii),
                _ => output.push(c),
            }
        }
        collapse_spaces(&output)
    }
}

/// Squash runs of spaces and trim the end; CJK transliterations carry trailing spaces
pub(crate) fn collapse_spaces(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut previous_space = false;
    for c in text.chars() {
        if c == ' ' {
            if !previous_space {
                output.push(c);
            }
            previous_space = true;
        } else {
            output.push(c);
            previous_space = false;
        }
    }
    output.trim_end().to_string()
}

#[async_trait]
impl RomanizationStrategy for GenericTransliterator {
    fn name(&self) -> &str {
        "generic"
    }

    async fn convert(&self, text: &str) -> Result<String, RomanizationError> {
        Ok(Self::transliterate(text))
    }
}
