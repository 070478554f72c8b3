/*!
 * IAST transliteration for the ISCII-derived Indic scripts.
 *
 * Devanagari, Bengali, Gurmukhi, Gujarati, Odia, Tamil, Telugu, Kannada and
 * Malayalam share the same layout inside their 128-codepoint Unicode blocks,
 * so one set of tables indexed by offset from the block start covers them all.
 * Consonants carry an inherent `a` that is written unless a vowel sign or a
 * virama follows.
 */

use async_trait::async_trait;

use crate::errors::RomanizationError;
use crate::script_detection::ScriptType;
use super::RomanizationStrategy;

const NUKTA: u32 = 0x3C;
const VIRAMA: u32 = 0x4D;
const TIPPI: u32 = 0x70;
const ADDAK: u32 = 0x71;

enum Letter {
    /// Takes an inherent `a`
    Consonant(&'static str),
    /// Replaces the inherent `a`
    VowelSign(&'static str),
    /// Written after the inherent `a`
    Modifier(&'static str),
    /// Stands alone
    Other(&'static str),
    Virama,
    Silent,
}

fn consonant(offset: u32) -> Option<&'static str> {
    let latin = match offset {
        0x15 => "k", 0x16 => "kh", 0x17 => "g", 0x18 => "gh", 0x19 => "ṅ",
        0x1A => "c", 0x1B => "ch", 0x1C => "j", 0x1D => "jh", 0x1E => "ñ",
        0x1F => "ṭ", 0x20 => "ṭh", 0x21 => "ḍ", 0x22 => "ḍh", 0x23 => "ṇ",
        0x24 => "t", 0x25 => "th", 0x26 => "d", 0x27 => "dh", 0x28 => "n",
        0x29 => "ṉ", 0x2A => "p", 0x2B => "ph", 0x2C => "b", 0x2D => "bh",
        0x2E => "m", 0x2F => "y", 0x30 => "r", 0x31 => "ṟ", 0x32 => "l",
        0x33 => "ḷ", 0x34 => "ḻ", 0x35 => "v", 0x36 => "ś", 0x37 => "ṣ",
        0x38 => "s", 0x39 => "h",
        0x58 => "q", 0x59 => "ḵẖ", 0x5A => "ġ", 0x5B => "z", 0x5C => "ṛ",
        0x5D => "ṛh", 0x5E => "f", 0x5F => "ẏ",
        _ => return None,
    };
    Some(latin)
}

fn independent_vowel(offset: u32) -> Option<&'static str> {
    let latin = match offset {
        0x05 => "a", 0x06 => "ā", 0x07 => "i", 0x08 => "ī", 0x09 => "u",
        0x0A => "ū", 0x0B => "ṛ", 0x0C => "ḷ", 0x0D => "ê", 0x0E => "e",
        0x0F => "e", 0x10 => "ai", 0x11 => "ô", 0x12 => "o", 0x13 => "o",
        0x14 => "au", 0x60 => "ṝ", 0x61 => "ḹ",
        _ => return None,
    };
    Some(latin)
}

fn vowel_sign(offset: u32) -> Option<&'static str> {
    let latin = match offset {
        0x3E => "ā", 0x3F => "i", 0x40 => "ī", 0x41 => "u", 0x42 => "ū",
        0x43 => "ṛ", 0x44 => "ṝ", 0x45 => "ê", 0x46 => "e", 0x47 => "e",
        0x48 => "ai", 0x49 => "ô", 0x4A => "o", 0x4B => "o", 0x4C => "au",
        0x62 => "ḷ", 0x63 => "ḹ",
        _ => return None,
    };
    Some(latin)
}

/// Classify a character of the block at `base`
fn classify(script: ScriptType, offset: u32) -> Option<Letter> {
    if let Some(latin) = consonant(offset) {
        return Some(Letter::Consonant(latin));
    }
    if let Some(latin) = vowel_sign(offset) {
        return Some(Letter::VowelSign(latin));
    }
    if let Some(latin) = independent_vowel(offset) {
        return Some(Letter::Other(latin));
    }

    let letter = match (offset, script) {
        (0x01, _) => Letter::Modifier("m̐"),
        (0x02, _) => Letter::Modifier("ṃ"),
        (0x03, _) => Letter::Modifier("ḥ"),
        (NUKTA, _) => Letter::Silent,
        (0x3D, _) => Letter::Other("'"),
        (VIRAMA, _) => Letter::Virama,
        (0x50, _) => Letter::Other("oṃ"),
        // AU length mark (Tamil, Malayalam, Bengali two-part vowels)
        (0x57, _) => Letter::Silent,
        (0x64, _) => Letter::Other("."),
        (0x65, _) => Letter::Other(".."),
        (TIPPI, ScriptType::Gurmukhi) => Letter::Modifier("ṃ"),
        (ADDAK, ScriptType::Gurmukhi) => Letter::Silent,
        (0x4E, ScriptType::Bengali) => Letter::Other("t"),
        (0x7A, ScriptType::Malayalam) => Letter::Other("ṇ"),
        (0x7B, ScriptType::Malayalam) => Letter::Other("n"),
        (0x7C, ScriptType::Malayalam) => Letter::Other("r"),
        (0x7D, ScriptType::Malayalam) => Letter::Other("l"),
        (0x7E, ScriptType::Malayalam) => Letter::Other("ḷ"),
        (0x7F, ScriptType::Malayalam) => Letter::Other("k"),
        _ => return None,
    };
    Some(letter)
}

/// Local IAST romanizer for one Brahmic script
#[derive(Debug, Clone)]
pub struct BrahmicRomanizer {
    script: ScriptType,
    base: u32,
    name: String,
}

impl BrahmicRomanizer {
    /// Create the romanizer, `None` for scripts outside the ISCII family
    pub fn new(script: ScriptType) -> Option<Self> {
        let base = script.brahmic_block()?;
        Some(Self {
            script,
            base,
            name: format!("{}-iast", script),
        })
    }

    /// Transliterate to IAST; characters outside the block are kept
    pub fn transliterate(&self, text: &str) -> String {
        let mut output = String::with_capacity(text.len());
        let mut pending_a = false;

        for c in text.chars() {
            let code = c as u32;
            let letter = code
                .checked_sub(self.base)
                .filter(|offset| *offset < 0x80)
                .and_then(|offset| {
                    if (0x66..=0x6F).contains(&offset) {
                        return None;
                    }
                    classify(self.script, offset)
                });

            let Some(letter) = letter else {
                if pending_a {
                    output.push('a');
                    pending_a = false;
                }
                match code.checked_sub(self.base + 0x66).filter(|digit| *digit < 10) {
                    Some(digit) => output.push(char::from(b'0' + digit as u8)),
                    None => output.push(c),
                }
                continue;
            };

            match letter {
                Letter::Consonant(latin) => {
                    if pending_a {
                        output.push('a');
                    }
                    output.push_str(latin);
                    pending_a = true;
                }
                Letter::VowelSign(latin) => {
                    output.push_str(latin);
                    pending_a = false;
                }
                Letter::Virama => pending_a = false,
                Letter::Silent => {}
                Letter::Modifier(latin) | Letter::Other(latin) => {
                    if pending_a {
                        output.push('a');
                        pending_a = false;
                    }
                    output.push_str(latin);
                }
            }
        }

        if pending_a {
            output.push('a');
        }
        output
    }
}

#[async_trait]
impl RomanizationStrategy for BrahmicRomanizer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn convert(&self, text: &str) -> Result<String, RomanizationError> {
        Ok(self.transliterate(text))
    }
}
