/*!
 * Tests for language code utilities
 */

use sly_lyrics::language_utils::{
    get_language_name, language_codes_match, normalize_language_code, split_region,
    validate_language_code,
};

#[test]
fn test_split_region() {
    assert_eq!(split_region("zh-CN"), ("zh", Some("CN")));
    assert_eq!(split_region("pt_BR"), ("pt", Some("BR")));
    assert_eq!(split_region(" en "), ("en", None));
}

#[test]
fn test_validate_language_code_with_valid_codes_should_succeed() {
    for code in ["en", "fr", "ja", "zh-CN", "pt-BR", "deu", "fre", "iw"] {
        assert!(validate_language_code(code).is_ok(), "{} should be valid", code);
    }
}

#[test]
fn test_validate_language_code_with_invalid_codes_should_fail() {
    for code in ["", "x", "xx", "english", "en-toolong", "en-U$"] {
        assert!(validate_language_code(code).is_err(), "{} should be invalid", code);
    }
}

#[test]
fn test_normalize_language_code() {
    assert_eq!(normalize_language_code("EN").unwrap(), "en");
    assert_eq!(normalize_language_code("ZH_cn").unwrap(), "zh-CN");
    assert_eq!(normalize_language_code("fre").unwrap(), "fr");
    assert_eq!(normalize_language_code("deu").unwrap(), "de");
}

#[test]
fn test_normalize_language_code_should_keep_legacy_codes() {
    assert_eq!(normalize_language_code("iw").unwrap(), "iw");
    assert_eq!(normalize_language_code("JW").unwrap(), "jw");
}

#[test]
fn test_language_codes_match() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("en-US", "en-GB"));
    assert!(language_codes_match("iw", "he"));
    assert!(language_codes_match("fre", "fr"));
    assert!(!language_codes_match("en", "fr"));
    assert!(!language_codes_match("xx", "xx"));
}

#[test]
fn test_get_language_name() {
    assert_eq!(get_language_name("fr").unwrap(), "French");
    assert_eq!(get_language_name("de-AT").unwrap(), "German");
    assert!(get_language_name("xx").is_err());
}
