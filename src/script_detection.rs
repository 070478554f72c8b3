/*!
 * Writing-system detection.
 *
 * Two granularities are offered:
 * - `detect_script` picks one dominant `ScriptType` for a whole batch of lines
 * - `segment_line` splits a single line into runs of compatible scripts
 */

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Writing system assigned to a body of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptType {
    Japanese,
    Chinese,
    Korean,
    Cyrillic,
    Devanagari,
    Gujarati,
    Gurmukhi,
    Telugu,
    Kannada,
    Odia,
    Tamil,
    Malayalam,
    Bengali,
    Arabic,
    Hebrew,
    Thai,
    Other,
}

impl ScriptType {
    /// Every script type, in scoring order with the catch-all last
    pub const ALL: [ScriptType; 17] = [
        Self::Japanese,
        Self::Chinese,
        Self::Korean,
        Self::Cyrillic,
        Self::Devanagari,
        Self::Gujarati,
        Self::Gurmukhi,
        Self::Telugu,
        Self::Kannada,
        Self::Odia,
        Self::Tamil,
        Self::Malayalam,
        Self::Bengali,
        Self::Arabic,
        Self::Hebrew,
        Self::Thai,
        Self::Other,
    ];

    /// Lowercase identifier, matching the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Japanese => "japanese",
            Self::Chinese => "chinese",
            Self::Korean => "korean",
            Self::Cyrillic => "cyrillic",
            Self::Devanagari => "devanagari",
            Self::Gujarati => "gujarati",
            Self::Gurmukhi => "gurmukhi",
            Self::Telugu => "telugu",
            Self::Kannada => "kannada",
            Self::Odia => "odia",
            Self::Tamil => "tamil",
            Self::Malayalam => "malayalam",
            Self::Bengali => "bengali",
            Self::Arabic => "arabic",
            Self::Hebrew => "hebrew",
            Self::Thai => "thai",
            Self::Other => "other",
        }
    }

    /// Scripts without an adequate local romanizer.
    ///
    /// For these the translation service is asked for the romanization in the
    /// same request as the translation.
    pub fn needs_remote_romanization(&self) -> bool {
        matches!(
            self,
            Self::Tamil | Self::Malayalam | Self::Bengali | Self::Arabic | Self::Hebrew | Self::Other
        )
    }

    /// Source-language hint used when asking the translation service for a phonetic reading
    pub fn google_language_code(&self) -> Option<&'static str> {
        match self {
            Self::Japanese => Some("ja"),
            Self::Chinese => Some("zh-CN"),
            Self::Korean => Some("ko"),
            Self::Cyrillic => Some("ru"),
            Self::Devanagari => Some("hi"),
            Self::Gujarati => Some("gu"),
            Self::Gurmukhi => Some("pa"),
            Self::Telugu => Some("te"),
            Self::Kannada => Some("kn"),
            Self::Odia => Some("or"),
            Self::Tamil => Some("ta"),
            Self::Malayalam => Some("ml"),
            Self::Bengali => Some("bn"),
            Self::Arabic => Some("ar"),
            Self::Hebrew => Some("iw"),
            Self::Thai => Some("th"),
            Self::Other => None,
        }
    }

    /// Scheme name understood by the Aksharamukha transliteration service
    pub fn transliteration_scheme(&self) -> Option<&'static str> {
        match self {
            Self::Devanagari => Some("Devanagari"),
            Self::Gujarati => Some("Gujarati"),
            Self::Gurmukhi => Some("Gurmukhi"),
            Self::Telugu => Some("Telugu"),
            Self::Kannada => Some("Kannada"),
            Self::Odia => Some("Oriya"),
            Self::Tamil => Some("Tamil"),
            Self::Malayalam => Some("Malayalam"),
            Self::Bengali => Some("Bengali"),
            Self::Arabic => Some("Arab"),
            Self::Hebrew => Some("Hebrew"),
            Self::Thai => Some("Thai"),
            _ => None,
        }
    }

    /// Unicode block start for the ISCII-derived Indic scripts
    pub fn brahmic_block(&self) -> Option<u32> {
        match self {
            Self::Devanagari => Some(0x0900),
            Self::Bengali => Some(0x0980),
            Self::Gurmukhi => Some(0x0A00),
            Self::Gujarati => Some(0x0A80),
            Self::Odia => Some(0x0B00),
            Self::Tamil => Some(0x0B80),
            Self::Telugu => Some(0x0C00),
            Self::Kannada => Some(0x0C80),
            Self::Malayalam => Some(0x0D00),
            _ => None,
        }
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ScriptType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|script| script.as_str() == lowered)
            .ok_or_else(|| anyhow!("Invalid script type: {}", s))
    }
}

/// Script of a single character, as used by line segmentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharScript {
    /// Spaces, digits, punctuation and anything unclassified
    Common,
    Latin,
    Hiragana,
    Katakana,
    Han,
    Hangul,
    Cyrillic,
    Devanagari,
    Gujarati,
    Gurmukhi,
    Telugu,
    Kannada,
    Odia,
    Tamil,
    Malayalam,
    Bengali,
    Arabic,
    Hebrew,
    Thai,
}

impl CharScript {
    /// Script type whose provider romanizes this segment, `None` for text kept as is
    pub fn script_type(&self) -> Option<ScriptType> {
        match self {
            Self::Common | Self::Latin => None,
            Self::Hiragana | Self::Katakana => Some(ScriptType::Japanese),
            Self::Han => Some(ScriptType::Chinese),
            Self::Hangul => Some(ScriptType::Korean),
            Self::Cyrillic => Some(ScriptType::Cyrillic),
            Self::Devanagari => Some(ScriptType::Devanagari),
            Self::Gujarati => Some(ScriptType::Gujarati),
            Self::Gurmukhi => Some(ScriptType::Gurmukhi),
            Self::Telugu => Some(ScriptType::Telugu),
            Self::Kannada => Some(ScriptType::Kannada),
            Self::Odia => Some(ScriptType::Odia),
            Self::Tamil => Some(ScriptType::Tamil),
            Self::Malayalam => Some(ScriptType::Malayalam),
            Self::Bengali => Some(ScriptType::Bengali),
            Self::Arabic => Some(ScriptType::Arabic),
            Self::Hebrew => Some(ScriptType::Hebrew),
            Self::Thai => Some(ScriptType::Thai),
        }
    }
}

/// A run of characters sharing a compatible script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptSegment {
    /// Segment text
    pub text: String,
    /// Script of the segment
    pub script: CharScript,
}

/// Ranges scored by `detect_script`, in tie-breaking order
const SCORED_RANGES: [(ScriptType, char, char); 15] = [
    (ScriptType::Chinese, '\u{4E00}', '\u{9FFF}'),
    (ScriptType::Korean, '\u{AC00}', '\u{D7AF}'),
    (ScriptType::Cyrillic, '\u{0400}', '\u{04FF}'),
    (ScriptType::Devanagari, '\u{0900}', '\u{097F}'),
    (ScriptType::Gujarati, '\u{0A80}', '\u{0AFF}'),
    (ScriptType::Gurmukhi, '\u{0A00}', '\u{0A7F}'),
    (ScriptType::Telugu, '\u{0C00}', '\u{0C7F}'),
    (ScriptType::Kannada, '\u{0C80}', '\u{0CFF}'),
    (ScriptType::Odia, '\u{0B00}', '\u{0B7F}'),
    (ScriptType::Tamil, '\u{0B80}', '\u{0BFF}'),
    (ScriptType::Malayalam, '\u{0D00}', '\u{0D7F}'),
    (ScriptType::Bengali, '\u{0980}', '\u{09FF}'),
    (ScriptType::Arabic, '\u{0600}', '\u{06FF}'),
    (ScriptType::Hebrew, '\u{0590}', '\u{05FF}'),
    (ScriptType::Thai, '\u{0E00}', '\u{0E7F}'),
];

/// Kana is only used by Japanese, so its presence settles the classification
fn is_kana(c: char) -> bool {
    ('\u{3040}'..='\u{30FF}').contains(&c)
}

/// Determine the dominant script of a batch of lines
pub fn detect_script<S: AsRef<str>>(lines: &[S]) -> ScriptType {
    if lines.iter().any(|line| line.as_ref().chars().any(is_kana)) {
        return ScriptType::Japanese;
    }

    let mut scores = [0usize; SCORED_RANGES.len()];
    for line in lines {
        for c in line.as_ref().chars() {
            if let Some(idx) = SCORED_RANGES
                .iter()
                .position(|(_, start, end)| (*start..=*end).contains(&c))
            {
                scores[idx] += 1;
            }
        }
    }

    // Strictly greater keeps the earlier entry on ties
    let mut best: Option<(ScriptType, usize)> = None;
    for (idx, score) in scores.iter().enumerate() {
        if *score > best.map_or(0, |(_, s)| s) {
            best = Some((SCORED_RANGES[idx].0, *score));
        }
    }

    best.map_or(ScriptType::Other, |(script, _)| script)
}

/// Classify a single character
pub fn char_script(c: char) -> CharScript {
    match c {
        'A'..='Z' | 'a'..='z' => CharScript::Latin,
        // Latin-1 supplement and extended Latin letters
        '\u{00C0}'..='\u{024F}' if c.is_alphabetic() => CharScript::Latin,
        '\u{1E00}'..='\u{1EFF}' => CharScript::Latin,
        '\u{3040}'..='\u{309F}' => CharScript::Hiragana,
        '\u{30A0}'..='\u{30FF}' | '\u{FF66}'..='\u{FF9F}' => CharScript::Katakana,
        '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}' => CharScript::Han,
        '\u{AC00}'..='\u{D7AF}' | '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}' => CharScript::Hangul,
        '\u{0400}'..='\u{04FF}' => CharScript::Cyrillic,
        '\u{0900}'..='\u{097F}' => CharScript::Devanagari,
        '\u{0980}'..='\u{09FF}' => CharScript::Bengali,
        '\u{0A00}'..='\u{0A7F}' => CharScript::Gurmukhi,
        '\u{0A80}'..='\u{0AFF}' => CharScript::Gujarati,
        '\u{0B00}'..='\u{0B7F}' => CharScript::Odia,
        '\u{0B80}'..='\u{0BFF}' => CharScript::Tamil,
        '\u{0C00}'..='\u{0C7F}' => CharScript::Telugu,
        '\u{0C80}'..='\u{0CFF}' => CharScript::Kannada,
        '\u{0D00}'..='\u{0D7F}' => CharScript::Malayalam,
        '\u{0600}'..='\u{06FF}' | '\u{0750}'..='\u{077F}' => CharScript::Arabic,
        '\u{0590}'..='\u{05FF}' => CharScript::Hebrew,
        '\u{0E00}'..='\u{0E7F}' => CharScript::Thai,
        _ => CharScript::Common,
    }
}

/// Decide whether two adjacent scripts belong in one segment.
///
/// Returns the script of the merged segment.
pub fn scripts_mergeable(current: CharScript, next: CharScript) -> Option<CharScript> {
    use CharScript::{Han, Hiragana, Katakana};

    if current == next {
        return Some(current);
    }

    match (current, next) {
        // Kanji mixed with kana is Japanese; keep the kana tag over generic Han
        (Han, Hiragana | Katakana) => Some(next),
        (Hiragana | Katakana, Han) => Some(current),
        (Hiragana, Katakana) | (Katakana, Hiragana) => Some(current),
        _ => None,
    }
}

/// Split a line into script segments covering it without gaps or overlaps
pub fn segment_line(text: &str) -> Vec<ScriptSegment> {
    let mut segments = Vec::new();
    let mut current_text = String::new();
    let mut current_script: Option<CharScript> = None;

    for c in text.chars() {
        let script = char_script(c);

        if script == CharScript::Common {
            current_text.push(c);
            continue;
        }

        match current_script {
            None => {
                current_script = Some(script);
                current_text.push(c);
            }
            Some(open) => match scripts_mergeable(open, script) {
                Some(merged) => {
                    current_script = Some(merged);
                    current_text.push(c);
                }
                None => {
                    segments.push(ScriptSegment {
                        text: std::mem::take(&mut current_text),
                        script: open,
                    });
                    current_text.push(c);
                    current_script = Some(script);
                }
            },
        }
    }

    if !current_text.is_empty() {
        segments.push(ScriptSegment {
            text: current_text,
            script: current_script.unwrap_or(CharScript::Common),
        });
    }

    segments
}

/// True when a line carries at least one letter
pub fn has_letters(text: &str) -> bool {
    text.chars().any(char::is_alphabetic)
}

/// Lines worth sending to a translator or romanizer: not blank, with letters
pub fn is_translatable(text: &str) -> bool {
    !text.trim().is_empty() && has_letters(text)
}
