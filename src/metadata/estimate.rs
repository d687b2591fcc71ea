//! Token count heuristics
//!
//! A cheap estimate of how many tokens a prompt will consume: the lower bound
//! scales with words, the upper bound with characters, and code is assumed
//! to tokenize 30% denser than prose.

use crate::models::{Confidence, TokenEstimate};

const TOKENS_PER_WORD: f64 = 0.75;
const TOKENS_PER_CHAR: f64 = 0.25;
const CODE_FACTOR: f64 = 1.3;

const HIGH_CONFIDENCE_BELOW: f64 = 1000.0;
const MEDIUM_CONFIDENCE_UP_TO: f64 = 5000.0;

/// Estimate the token range of `text`
pub fn estimate_tokens(text: &str, is_code: bool) -> TokenEstimate {
    let word_count = text.split_whitespace().count() as f64;
    let char_count = text.chars().count() as f64;

    let mut min = TOKENS_PER_WORD * word_count;
    let mut max = TOKENS_PER_CHAR * char_count;

    if is_code {
        min *= CODE_FACTOR;
        max *= CODE_FACTOR;
    }

    let min = min.round().max(0.0);
    let max = max.round().max(0.0);

    let average = (min + max) / 2.0;
    let confidence = if average < HIGH_CONFIDENCE_BELOW {
        Confidence::High
    } else if average <= MEDIUM_CONFIDENCE_UP_TO {
        Confidence::Medium
    } else {
        Confidence::Low
    };

    TokenEstimate::new(min, max, confidence)
}

/// Crude check for content that looks like source code
pub fn detect_code(content: &str) -> bool {
    const MARKERS: [&str; 6] = ["```", "=>", "{", ";", "(", "console."];

    MARKERS.iter().any(|marker| content.contains(marker))
        || contains_word(content, "function")
        || keyword_followed_by_space(content, "import")
        || keyword_followed_by_space(content, "export")
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.match_indices(word).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + word.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

fn keyword_followed_by_space(haystack: &str, keyword: &str) -> bool {
    haystack.match_indices(keyword).any(|(start, _)| {
        haystack[start + keyword.len()..]
            .chars()
            .next()
            .is_some_and(char::is_whitespace)
    })
}
