//! Input normalization
//!
//! Turns what the user typed into the canonical text the parser accepts.
//! Stages run in a fixed order, each feeding the next:
//!
//! 1. operator glyphs `×` `÷` `−` become `*` `/` `-`
//! 2. a numeral directly followed by `%` becomes `(N/100)`
//! 3. `^` becomes `**`
//! 4. whitelisted function calls and constants are qualified with the
//!    namespace prefix, matched on word boundaries only

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::core::namespace::MathNamespace;

/// `N%` where N is a run of digits and decimal points
fn percent_literal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([0-9.]+)%").expect("percent pattern is valid"))
}

/// Whole-word call of a whitelisted function. `log10` is listed before `log`
/// and the `\b` anchor keeps `mylog(` untouched.
fn function_call() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(sqrt|sin|cos|tan|log10|log)\(").expect("function pattern is valid")
    })
}

/// Whole-word whitelisted constant
fn constant_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(PI|E)\b").expect("constant pattern is valid"))
}

/// Stage 1: localized operator glyphs to ASCII
#[must_use]
pub fn replace_glyphs(input: &str) -> String {
    input
        .chars()
        .map(|ch| match ch {
            '×' => '*',
            '÷' => '/',
            '−' => '-',
            other => other,
        })
        .collect()
}

/// Stage 2: `N%` to `(N/100)`. A `%` not directly after a numeral is left
/// alone and later rejected by the tokenizer.
#[must_use]
pub fn expand_percent(input: &str) -> Cow<'_, str> {
    percent_literal().replace_all(input, "($1/100)")
}

/// Stage 3: caret to the power operator
#[must_use]
pub fn expand_caret(input: &str) -> String {
    input.replace('^', "**")
}

/// True when the match is a member access (`x.sqrt(`), which is left as is
fn is_member_access(haystack: &str, caps: &Captures<'_>) -> bool {
    caps.get(0)
        .is_some_and(|m| haystack[..m.start()].ends_with('.'))
}

/// Stage 4: qualify whitelisted names with the namespace prefix.
///
/// Names already preceded by a `.` (such as `Math.sqrt(`) are not touched.
#[must_use]
pub fn qualify_names(input: &str, namespace: &MathNamespace) -> String {
    let calls = function_call().replace_all(input, |caps: &Captures<'_>| {
        if is_member_access(input, caps) {
            caps[0].to_string()
        } else {
            format!("{}(", namespace.qualify(&caps[1]))
        }
    });
    constant_name()
        .replace_all(&calls, |caps: &Captures<'_>| {
            if is_member_access(&calls, caps) {
                caps[0].to_string()
            } else {
                namespace.qualify(&caps[1])
            }
        })
        .into_owned()
}

/// Runs the whole pipeline
#[must_use]
pub fn normalize(input: &str, namespace: &MathNamespace) -> String {
    let glyphs = replace_glyphs(input);
    let percent = expand_percent(&glyphs);
    let power = expand_caret(&percent);
    qualify_names(&power, namespace)
}
