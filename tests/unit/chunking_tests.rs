/*!
 * Tests for chunking lines under a request ceiling
 */

use sly_lyrics::translation::chunking::{
    chunk_by_char_count, joined_length, line_length, split_response_lines,
};

#[test]
fn test_line_length_should_count_utf16_units() {
    assert_eq!(line_length("abc"), 3);
    assert_eq!(line_length("사랑"), 2);
    // Outside the BMP: one char, two code units
    assert_eq!(line_length("😀"), 2);
}

#[test]
fn test_joined_length_should_include_separators() {
    assert_eq!(joined_length(&["ab", "c"]), 4);
    assert_eq!(joined_length::<&str>(&[]), 0);
}

#[test]
fn test_chunk_by_char_count_with_empty_input_should_be_empty() {
    let lines: Vec<String> = Vec::new();
    assert!(chunk_by_char_count(&lines, 10).is_empty());
}

#[test]
fn test_chunk_by_char_count_should_fill_to_exact_ceiling() {
    let chunks = chunk_by_char_count(&["ab", "cd", "ef"], 5);
    assert_eq!(chunks, vec![vec!["ab", "cd"], vec!["ef"]]);
}

#[test]
fn test_chunk_by_char_count_should_measure_surrogate_pairs() {
    let chunks = chunk_by_char_count(&["😀😀", "x"], 4);
    assert_eq!(chunks.len(), 2);
}

#[test]
fn test_chunk_by_char_count_should_keep_order_and_respect_ceiling() {
    let lines: Vec<String> = (0..40).map(|i| format!("line number {}", i)).collect();
    let chunks = chunk_by_char_count(&lines, 60);

    for chunk in &chunks {
        assert!(joined_length(chunk) <= 60);
    }
    let flattened: Vec<String> = chunks.into_iter().flatten().collect();
    assert_eq!(flattened, lines);
}

#[test]
fn test_split_response_lines_should_strip_carriage_returns() {
    assert_eq!(split_response_lines("a\r\nb", 2), vec!["a", "b"]);
}

#[test]
fn test_split_response_lines_should_drop_one_trailing_empty_line() {
    assert_eq!(split_response_lines("a\nb\n", 2), vec!["a", "b"]);
    // Only when there is one line too many
    assert_eq!(split_response_lines("a\n", 2), vec!["a", ""]);
}

#[test]
fn test_split_response_lines_should_report_missing_lines() {
    assert_eq!(split_response_lines("a\nb", 3).len(), 2);
}
