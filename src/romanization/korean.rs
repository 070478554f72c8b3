use async_trait::async_trait;

use crate::errors::RomanizationError;
use super::RomanizationStrategy;

const SYLLABLE_BASE: u32 = 0xAC00;
const SYLLABLE_LAST: u32 = 0xD7A3;
const MEDIAL_COUNT: u32 = 21;
const FINAL_COUNT: u32 = 28;

/// Initial consonants; index 11 is the silent ㅇ
const INITIALS: [&str; 19] = [
    "g", "kk", "n", "d", "tt", "r", "m", "b", "pp", "s", "ss", "", "j", "jj", "ch", "k", "t", "p", "h",
];

const MEDIALS: [&str; 21] = [
    "a", "ae", "ya", "yae", "eo", "e", "yeo", "ye", "o", "wa", "wae", "oe", "yo", "u", "wo", "we", "wi",
    "yu", "eu", "ui", "i",
];

/// Final consonants before a consonant or at the end of a word
const FINALS: [&str; 28] = [
    "", "k", "k", "k", "n", "n", "n", "t", "l", "k", "m", "l", "l", "l", "p", "l", "m", "p", "p", "t",
    "t", "ng", "t", "t", "k", "t", "p", "t",
];

/// Final consonants before a silent initial: (kept in the syllable, carried over)
const LIAISON: [(&str, &str); 28] = [
    ("", ""), ("", "g"), ("", "kk"), ("k", "s"), ("", "n"), ("n", "j"), ("", "n"), ("", "d"),
    ("", "r"), ("l", "g"), ("l", "m"), ("l", "b"), ("l", "s"), ("l", "t"), ("l", "p"), ("", "r"),
    ("", "m"), ("", "b"), ("p", "s"), ("", "s"), ("", "ss"), ("ng", ""), ("", "j"), ("", "ch"),
    ("", "k"), ("", "t"), ("", "p"), ("", ""),
];

const SILENT_INITIAL: usize = 11;
const RIEUL_INITIAL: usize = 5;
const RIEUL_FINAL: usize = 8;

/// Jamo indices of a precomposed Hangul syllable
fn decompose(c: char) -> Option<(usize, usize, usize)> {
    let code = c as u32;
    if !(SYLLABLE_BASE..=SYLLABLE_LAST).contains(&code) {
        return None;
    }
    let index = code - SYLLABLE_BASE;
    let initial = index / (MEDIAL_COUNT * FINAL_COUNT);
    let medial = (index % (MEDIAL_COUNT * FINAL_COUNT)) / FINAL_COUNT;
    let last = index % FINAL_COUNT;
    Some((initial as usize, medial as usize, last as usize))
}

/// Revised Romanization of Korean, with liaison across syllables of a word
pub fn romanize(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut output = String::with_capacity(text.len() * 2);
    // Onset carried over from the previous syllable's final
    let mut carried: Option<&str> = None;

    for (idx, &c) in chars.iter().enumerate() {
        let Some((initial, medial, last)) = decompose(c) else {
            carried = None;
            output.push(c);
            continue;
        };

        match carried.take() {
            Some(onset) => output.push_str(onset),
            None => output.push_str(INITIALS[initial]),
        }
        output.push_str(MEDIALS[medial]);

        let next = chars.get(idx + 1).and_then(|n| decompose(*n));
        match next {
            Some((SILENT_INITIAL, _, _)) if last != 0 => {
                let (kept, moved) = LIAISON[last];
                output.push_str(kept);
                carried = Some(moved);
            }
            Some((RIEUL_INITIAL, _, _)) if last == RIEUL_FINAL => {
                output.push('l');
                carried = Some("l");
            }
            _ => output.push_str(FINALS[last]),
        }
    }

    output
}

/// Revised Romanization strategy
#[derive(Debug, Default, Clone)]
pub struct RevisedRomanizer;

#[async_trait]
impl RomanizationStrategy for RevisedRomanizer {
    fn name(&self) -> &str {
        "revised-romanization"
    }

    async fn convert(&self, text: &str) -> Result<String, RomanizationError> {
        Ok(romanize(text))
    }
}
