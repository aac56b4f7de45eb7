//! Filename sanitization utilities

/// Characters kept besides word characters and whitespace
const KEPT_PUNCTUATION: &[char] = &['-', '_', '(', ')', '[', ']'];

/// Strip every character that is not safe in a filename
///
/// Keeps Unicode letters and digits, underscore, hyphen, whitespace,
/// parentheses and square brackets. Anything else is dropped outright
/// rather than replaced, so the result never contains path separators or
/// shell-hostile punctuation.
pub fn strip_unsafe_chars(name: &str) -> String {
    name.chars()
        .filter(|&c| c.is_alphanumeric() || c.is_whitespace() || KEPT_PUNCTUATION.contains(&c))
        .collect()
}
