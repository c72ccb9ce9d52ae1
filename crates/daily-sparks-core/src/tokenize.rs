//! Title tokenizer for free-text relevance matching.

/// Split free text into normalized word tokens.
///
/// Tokens are runs of ASCII letters and digits, lowercased, with tokens
/// shorter than 3 characters discarded. Anything else (punctuation,
/// whitespace, non-ASCII characters) acts as a separator. Tokens are
/// emitted in source order and are not deduplicated; the scorer treats
/// them as a set.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| word.len() >= 3)
        .map(|word| word.to_ascii_lowercase())
        .collect()
}
