//! Language utilities for target-language codes
//!
//! Translation services take ISO 639-1 codes, optionally with a region
//! suffix (`zh-CN`, `pt-BR`), and still use a few legacy codes such as `iw`
//! for Hebrew. Three-letter ISO 639-2/T and 639-2/B codes are accepted and
//! normalized to their two-letter form when one exists.

use anyhow::{Result, anyhow};
use isolang::Language;

/// Legacy two-letter codes still used by translation services
const LEGACY_CODES: [(&str, &str); 3] = [("iw", "he"), ("jw", "jv"), ("in", "id")];

/// ISO 639-2/B codes that differ from their 639-2/T form
const BIBLIOGRAPHIC_CODES: [(&str, &str); 18] = [
    ("fre", "fra"), ("ger", "deu"), ("dut", "nld"), ("gre", "ell"), ("chi", "zho"), ("cze", "ces"),
    ("ice", "isl"), ("alb", "sqi"), ("arm", "hye"), ("baq", "eus"), ("bur", "mya"), ("per", "fas"),
    ("geo", "kat"), ("may", "msa"), ("mac", "mkd"), ("rum", "ron"), ("slo", "slk"), ("wel", "cym"),
];

/// Split `zh-CN` into (`zh`, `Some("CN")`); `_` is accepted as separator
pub fn split_region(code: &str) -> (&str, Option<&str>) {
    let code = code.trim();
    match code.split_once(['-', '_']) {
        Some((base, region)) => (base, Some(region)),
        None => (code, None),
    }
}

fn lookup(base: &str) -> Option<Language> {
    let base = base.to_lowercase();
    match base.len() {
        2 => {
            let base = LEGACY_CODES
                .iter()
                .find(|(legacy, _)| *legacy == base)
                .map_or(base.as_str(), |(_, current)| *current);
            Language::from_639_1(base)
        }
        3 => {
            let base = BIBLIOGRAPHIC_CODES
                .iter()
                .find(|(bibliographic, _)| *bibliographic == base)
                .map_or(base.as_str(), |(_, terminological)| *terminological);
            Language::from_639_3(base)
        }
        _ => None,
    }
}

fn valid_region(region: &str) -> bool {
    matches!(region.len(), 2..=4) && region.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Validate a target-language code
pub fn validate_language_code(code: &str) -> Result<()> {
    let (base, region) = split_region(code);
    if lookup(base).is_none() {
        return Err(anyhow!("Invalid language code: {}", code));
    }
    if let Some(region) = region {
        if !valid_region(region) {
            return Err(anyhow!("Invalid region in language code: {}", code));
        }
    }
    Ok(())
}

/// Normalize a code to the form sent to translation services.
///
/// The base becomes lowercase ISO 639-1 when one exists (ISO 639-3
/// otherwise), a region suffix becomes uppercase: `ZH_cn` gives `zh-CN`,
/// `fre` gives `fr`. Legacy codes such as `iw` are kept as given.
pub fn normalize_language_code(code: &str) -> Result<String> {
    validate_language_code(code)?;
    let (base, region) = split_region(code);
    let base = base.to_lowercase();

    let normalized_base = if LEGACY_CODES.iter().any(|(legacy, _)| *legacy == base) {
        base
    } else {
        let language = lookup(&base).ok_or_else(|| anyhow!("Invalid language code: {}", code))?;
        match language.to_639_1() {
            Some(part1) => part1.to_string(),
            None => language.to_639_3().to_string(),
        }
    };

    Ok(match region {
        Some(region) => format!("{}-{}", normalized_base, region.to_uppercase()),
        None => normalized_base,
    })
}

/// Check if two language codes name the same language, ignoring regions
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (lookup(split_region(code1).0), lookup(split_region(code2).0)) {
        (Some(first), Some(second)) => first == second,
        _ => false,
    }
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let language = lookup(split_region(code).0)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", code))?;

    Ok(language.to_name().to_string())
}
