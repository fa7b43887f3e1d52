//! Core calculator: normalization, restricted-grammar parsing, evaluation
//! and the bounded history log.
//!
//! Nothing in here executes anything but arithmetic. Every input string maps
//! to either a finite number or [`Evaluation::Failure`].

pub mod evaluator;
pub mod history;
pub mod namespace;
pub mod normalize;
mod operations;
pub mod parser;

pub use evaluator::{evaluate, Evaluator};
pub use operations::Operation;

use std::fmt;
use thiserror::Error;

/// Text shown in place of a result when evaluation fails
pub const FAILURE_TEXT: &str = "Error";

/// Result type for the internal evaluation pipeline
pub type CalcResult<T> = Result<T, CalcError>;

/// Reasons an expression could not be turned into a finite number.
///
/// These never cross the [`Evaluator::evaluate`] boundary; callers only see
/// [`Evaluation::Failure`]. [`Evaluator::try_evaluate`] exposes them for
/// diagnostics and tests.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// Nothing left to evaluate after trimming
    #[error("Empty expression")]
    EmptyExpression,
    /// Character outside the token set
    #[error("Unexpected character: '{0}'")]
    UnexpectedCharacter(char),
    /// Operator recognised but not part of the grammar (`++`, `--`)
    #[error("Unsupported operator: '{0}'")]
    UnsupportedOperator(String),
    /// Identifier that is not a whitelisted namespace member
    #[error("Unknown identifier: '{0}'")]
    UnknownIdentifier(String),
    /// Malformed numeric literal
    #[error("Invalid number: '{0}'")]
    InvalidNumber(String),
    /// Structural error: unbalanced parentheses, dangling operator, ...
    #[error("Invalid expression: {0}")]
    Parse(String),
    /// Evaluation produced NaN or an infinity
    #[error("Non-finite result: {0}")]
    NonFinite(f64),
}

impl CalcError {
    /// Create a structural parse error
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

/// Outcome of evaluating an expression: a finite number or the failure marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation {
    /// Finite numeric result
    Value(f64),
    /// The expression could not produce a finite number
    Failure,
}

impl Evaluation {
    /// Returns true for the failure marker
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure)
    }

    /// Returns the numeric value, if any
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Failure => None,
        }
    }

    /// Renders the result, using `failure_text` for the failure marker
    #[must_use]
    pub fn render(&self, failure_text: &str) -> String {
        match self {
            Self::Value(v) => format_number(*v),
            Self::Failure => failure_text.to_string(),
        }
    }
}

impl From<CalcResult<f64>> for Evaluation {
    fn from(result: CalcResult<f64>) -> Self {
        match result {
            Ok(v) if v.is_finite() => Self::Value(v),
            _ => Self::Failure,
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(FAILURE_TEXT))
    }
}

/// Formats a number the way a browser prints it.
///
/// Shortest round-trip digits; exponent form outside `[1e-6, 1e21)`
/// (`1e+21`, `1e-7`); negative zero prints as `0`.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return if value.is_nan() {
            "NaN".to_string()
        } else if value > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{value}");
    }

    let scientific = format!("{value:e}");
    match scientific.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => scientific,
    }
}
