//! Local rule-based helper for percent, GST and plain arithmetic questions

use std::sync::OnceLock;

use regex::Regex;

use crate::core::{format_number, Evaluator};

/// Reply when no rule applies
pub const FALLBACK_ANSWER: &str =
    "Sorry, I can answer percent/GST/basic math questions like \"18% of 500\".";

/// `gst [@] P[%] of A`
fn gst_question() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"gst\s*@?\s*([0-9.]+)\s*%?\s*of\s*([0-9.]+)").expect("gst pattern is valid")
    })
}

/// `P% A`, `P% of A` or `P of A`
fn percent_question() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([0-9.]+)\s*(?:%\s*(?:of)?|of)\s*([0-9.]+)").expect("percent pattern is valid")
    })
}

/// Characters that suggest the question is an arithmetic expression
fn looks_arithmetic(question: &str) -> bool {
    question
        .chars()
        .any(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '*' | '/' | '^' | '.' | '%'))
}

fn capture_pair(re: &Regex, text: &str) -> Option<(f64, f64)> {
    let caps = re.captures(text)?;
    let pct = caps[1].parse().ok()?;
    let amount = caps[2].parse().ok()?;
    Some((pct, amount))
}

/// Answers a question locally.
///
/// Arithmetic that fails renders as `failure_text`. Returns `None` for a
/// blank question.
#[must_use]
pub fn local_answer(question: &str, evaluator: &Evaluator, failure_text: &str) -> Option<String> {
    let question = question.trim();
    if question.is_empty() {
        return None;
    }
    let lower = question.to_lowercase();

    if let Some((pct, amount)) = capture_pair(gst_question(), &lower) {
        let tax = pct / 100.0 * amount;
        return Some(format!(
            "GST {}% on {} = {} → Total = {}",
            format_number(pct),
            format_number(amount),
            format_number(tax),
            format_number(amount + tax)
        ));
    }

    if let Some((pct, amount)) = capture_pair(percent_question(), &lower) {
        return Some(format!(
            "{}% of {} = {}",
            format_number(pct),
            format_number(amount),
            format_number(pct / 100.0 * amount)
        ));
    }

    if looks_arithmetic(&lower) {
        let answer = evaluator.evaluate(question).render(failure_text);
        return Some(format!("Answer: {answer}"));
    }

    Some(FALLBACK_ANSWER.to_string())
}
