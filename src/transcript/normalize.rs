//! Caption text normalization

/// Remove caption sequence numbers from a cue's text.
///
/// Every line that is entirely an integer is dropped. All other lines are kept
/// verbatim, each followed by `'\n'`. Empty input yields empty output.
pub fn normalize_caption(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len() + 1);

    for line in text.lines().filter(|line| !is_integer(line)) {
        normalized.push_str(line);
        normalized.push('\n');
    }

    normalized
}

/// Integer literal with an optional sign and no magnitude limit. Single
/// underscores may group digits (`1_000`). Surrounding whitespace is tolerated.
fn is_integer(line: &str) -> bool {
    let trimmed = line.trim();
    let digits = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);

    !digits.is_empty()
        && digits
            .split('_')
            .all(|group| !group.is_empty() && group.bytes().all(|b| b.is_ascii_digit()))
}
