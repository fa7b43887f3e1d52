//! Spoken-operator substitution for speech transcripts
//!
//! Recognition itself happens in the browser; this only rewrites operator
//! words in the transcript into symbols before it is appended to the
//! expression.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Operator phrases, longest alternatives first so `divide by` is consumed
/// as a single unit
fn operator_words() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(to\s+the\s+power\s+of|power\s+of|multiplied\s+by|divided\s+by|divide\s+by|plus|minus|times|into|x|divide|by)\b",
        )
        .expect("operator word pattern is valid")
    })
}

fn symbol_for(phrase: &str) -> &'static str {
    let lower = phrase.to_ascii_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    match words.as_slice() {
        ["plus"] => "+",
        ["minus"] => "-",
        ["times" | "into" | "x"] | ["multiplied", "by"] => "*",
        [.., "power", "of"] => "**",
        _ => "/",
    }
}

/// Rewrites spoken operators (`plus`, `minus`, `times`, `divided by`,
/// `power of`, ...) into symbols. Matching is case-insensitive and on whole
/// words only.
#[must_use]
pub fn transcript_to_expression(transcript: &str) -> String {
    operator_words()
        .replace_all(transcript, |caps: &Captures<'_>| symbol_for(&caps[1]))
        .into_owned()
}
