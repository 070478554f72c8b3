use async_trait::async_trait;

use crate::errors::RomanizationError;
use super::RomanizationStrategy;

/// Latin form of a lowercase Cyrillic letter (Russian preset, with the
/// Ukrainian, Belarusian and South Slavic letters added)
fn latin_for(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a", 'б' => "b", 'в' => "v", 'г' => "g", 'д' => "d",
        'е' => "e", 'ё' => "yo", 'ж' => "zh", 'з' => "z", 'и' => "i",
        'й' => "y", 'к' => "k", 'л' => "l", 'м' => "m", 'н' => "n",
        'о' => "o", 'п' => "p", 'р' => "r", 'с' => "s", 'т' => "t",
        'у' => "u", 'ф' => "f", 'х' => "kh", 'ц' => "ts", 'ч' => "ch",
        'ш' => "sh", 'щ' => "shch", 'ъ' => "", 'ы' => "y", 'ь' => "",
        'э' => "e", 'ю' => "yu", 'я' => "ya",
        'і' => "i", 'ї' => "yi", 'є' => "ye", 'ґ' => "g", 'ў' => "w",
        'ђ' => "dj", 'ј' => "j", 'љ' => "lj", 'њ' => "nj", 'ћ' => "c",
        'џ' => "dz", 'ѓ' => "gj", 'ќ' => "kj", 'ѕ' => "dz",
        _ => return None,
    };
    Some(latin)
}

/// Transliterate Cyrillic text, preserving letter case
pub fn transliterate(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut output = String::with_capacity(text.len());

    for (idx, &c) in chars.iter().enumerate() {
        let lower = c.to_lowercase().next().unwrap_or(c);
        let Some(latin) = latin_for(lower) else {
            output.push(c);
            continue;
        };

        if c == lower || latin.is_empty() {
            output.push_str(latin);
            continue;
        }

        // Uppercase inside an all-caps word stays all-caps: "ЩИ" -> "SHCHI"
        let next_is_upper = chars.get(idx + 1).is_some_and(|n| n.is_uppercase());
        if next_is_upper {
            output.push_str(&latin.to_uppercase());
        } else {
            let mut letters = latin.chars();
            if let Some(first) = letters.next() {
                output.extend(first.to_uppercase());
                output.push_str(letters.as_str());
            }
        }
    }

    output
}

/// Table-driven Cyrillic romanizer
#[derive(Debug, Default, Clone)]
pub struct CyrillicRomanizer;

#[async_trait]
impl RomanizationStrategy for CyrillicRomanizer {
    fn name(&self) -> &str {
        "cyrillic-table"
    }

    async fn convert(&self, text: &str) -> Result<String, RomanizationError> {
        Ok(transliterate(text))
    }
}
