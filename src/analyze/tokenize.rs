//! Transcript normalization and tokenization.
//!
//! Splits an utterance into word and punctuation tokens in order, the way a
//! speech-to-text transcript reads: `...` and the em-dash are single tokens,
//! every other punctuation mark stands alone, and the word subset keeps only
//! purely alphabetic tokens.

use once_cell::sync::Lazy;
use regex::Regex;

// Ellipsis must come first so `...` is not eaten as three `.` tokens.
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.{3}|\w+|[^\w\s]").expect("tokenizer regex"));

/// Lowercase and trim the transcript. All downstream measurements (including
/// the scorer's character gate) operate on this form.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Tokenize a normalized transcript into `(words, all_tokens)`.
///
/// `all_tokens` preserves order and includes punctuation; `words` is the
/// alphabetic-only subset. Empty input yields two empty vectors; callers
/// guard their ratios with `max(denominator, 1)` rather than erroring.
pub fn normalize_and_tokenize(text: &str) -> (Vec<String>, Vec<String>) {
    let normalized = normalize(text);

    let all_tokens: Vec<String> = TOKEN_RE
        .find_iter(&normalized)
        .map(|m| m.as_str().to_string())
        .collect();

    let words: Vec<String> = all_tokens
        .iter()
        .filter(|t| !t.is_empty() && t.chars().all(|c| c.is_alphabetic()))
        .cloned()
        .collect();

    (words, all_tokens)
}
