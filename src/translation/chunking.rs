/*!
 * Line chunking for size-limited services.
 *
 * Lengths are counted in UTF-16 code units, the unit the remote services
 * measure requests in. Lines inside a chunk are joined with `\n`.
 */

/// Length of one line in UTF-16 code units
pub fn line_length(line: &str) -> usize {
    line.encode_utf16().count()
}

/// Length of a chunk once its lines are joined with newlines
pub fn joined_length<S: AsRef<str>>(chunk: &[S]) -> usize {
    let separators = chunk.len().saturating_sub(1);
    chunk.iter().map(|line| line_length(line.as_ref())).sum::<usize>() + separators
}

/// Group lines into ordered chunks whose joined length stays within `max_chars`.
///
/// Greedy: a line joins the open chunk when the chunk is empty or the joined
/// length plus the separator and the line fits. A single line longer than the
/// ceiling forms its own chunk. Concatenating the chunks gives back the input.
pub fn chunk_by_char_count<S: AsRef<str>>(lines: &[S], max_chars: usize) -> Vec<Vec<String>> {
    let mut chunks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_length = 0;

    for line in lines {
        let line = line.as_ref();
        let length = line_length(line);

        if !current.is_empty() && current_length + 1 + length > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_length = 0;
        }

        current_length = if current.is_empty() { length } else { current_length + 1 + length };
        current.push(line.to_string());
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Split a newline-joined service response back into lines.
///
/// Carriage returns are dropped and one trailing empty line is ignored when
/// the response has more lines than were sent.
pub fn split_response_lines(text: &str, expected: usize) -> Vec<String> {
    let mut lines: Vec<String> = text
        .split('\n')
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect();

    if lines.len() > expected && lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    lines
}
