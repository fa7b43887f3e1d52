//! AST evaluator and the total `evaluate` entry point

use tracing::debug;

use crate::core::namespace::MathNamespace;
use crate::core::normalize::normalize;
use crate::core::parser::{AstNode, Parser};
use crate::core::{CalcError, CalcResult, Evaluation};

/// Evaluator for user-supplied arithmetic text
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    namespace: MathNamespace,
}

impl Evaluator {
    /// Creates an evaluator over the standard `Math` namespace
    #[must_use]
    pub fn new() -> Self {
        Self {
            namespace: MathNamespace::new(),
        }
    }

    /// Creates an evaluator over a custom namespace
    #[must_use]
    pub fn with_namespace(namespace: MathNamespace) -> Self {
        Self { namespace }
    }

    /// Returns the namespace used for normalization and lookups
    #[must_use]
    pub fn namespace(&self) -> &MathNamespace {
        &self.namespace
    }

    /// Evaluates an AST node.
    ///
    /// Intermediate values follow IEEE-754; only the final result is checked
    /// for finiteness.
    #[must_use]
    pub fn evaluate_ast(&self, node: &AstNode) -> f64 {
        match node {
            AstNode::Number(n) => *n,
            AstNode::Constant(c) => c.value(),
            AstNode::Negate(inner) => -self.evaluate_ast(inner),
            AstNode::BinaryOp { left, op, right } => {
                op.apply(self.evaluate_ast(left), self.evaluate_ast(right))
            }
            AstNode::Call { function, argument } => function.apply(self.evaluate_ast(argument)),
        }
    }

    /// Normalizes, parses and evaluates, reporting why evaluation failed
    pub fn try_evaluate(&self, input: &str) -> CalcResult<f64> {
        let normalized = normalize(input, &self.namespace);
        let ast = Parser::parse_str(&normalized, &self.namespace)?;
        let value = self.evaluate_ast(&ast);

        if value.is_finite() {
            Ok(value)
        } else {
            Err(CalcError::NonFinite(value))
        }
    }

    /// Evaluates `input`, folding every error into [`Evaluation::Failure`]
    #[must_use]
    pub fn evaluate(&self, input: &str) -> Evaluation {
        match self.try_evaluate(input) {
            Ok(value) => Evaluation::Value(value),
            Err(err) => {
                debug!(input, error = %err, "evaluation failed");
                Evaluation::Failure
            }
        }
    }
}

/// Evaluates `input` with the standard namespace
#[must_use]
pub fn evaluate(input: &str) -> Evaluation {
    Evaluator::new().evaluate(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::namespace::{MathConstant, MathFunction};
    use crate::core::Operation;

    fn value(input: &str) -> f64 {
        evaluate(input)
            .value()
            .unwrap_or_else(|| panic!("{input} should evaluate"))
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {expected}, got {actual}"
        );
    }

    // ===== AST evaluation =====

    #[test]
    fn test_evaluate_ast_nodes() {
        let eval = Evaluator::new();
        assert_eq!(eval.evaluate_ast(&AstNode::number(42.0)), 42.0);
        assert_eq!(
            eval.evaluate_ast(&AstNode::negate(AstNode::number(5.0))),
            -5.0
        );
        assert_eq!(
            eval.evaluate_ast(&AstNode::Constant(MathConstant::Pi)),
            std::f64::consts::PI
        );
        assert_eq!(
            eval.evaluate_ast(&AstNode::call(MathFunction::Sqrt, AstNode::number(9.0))),
            3.0
        );
    }

    #[test]
    fn test_evaluate_ast_nested() {
        let eval = Evaluator::new();
        // (1 + 2) * (3 + 4)
        let ast = AstNode::binary(
            AstNode::binary(AstNode::number(1.0), Operation::Add, AstNode::number(2.0)),
            Operation::Multiply,
            AstNode::binary(AstNode::number(3.0), Operation::Add, AstNode::number(4.0)),
        );
        assert_eq!(eval.evaluate_ast(&ast), 21.0);
    }

    // ===== Arithmetic =====

    #[test]
    fn test_basic_operations() {
        assert_eq!(value("10 + 5"), 15.0);
        assert_eq!(value("10 - 3"), 7.0);
        assert_eq!(value("6 * 7"), 42.0);
        assert_eq!(value("20 / 4"), 5.0);
        assert_eq!(value("3 ** 4"), 81.0);
    }

    #[test]
    fn test_precedence_and_parentheses() {
        assert_eq!(value("2 + 3 * 4"), 14.0);
        assert_eq!(value("(2 + 3) * 4"), 20.0);
        assert_eq!(value("42 * (3 + 7)"), 420.0);
        assert_eq!(value("2 ** 3 ** 2"), 512.0);
    }

    #[test]
    fn test_glyph_operators() {
        assert_eq!(value("2×3"), 6.0);
        assert_eq!(value("8÷2"), 4.0);
        assert_eq!(value("5−2"), 3.0);
    }

    #[test]
    fn test_caret_power() {
        assert_eq!(value("2^10"), 1024.0);
        assert_eq!(value("2^-1"), 0.5);
    }

    #[test]
    fn test_percent() {
        assert_eq!(value("50%"), 0.5);
        assert_eq!(value("200*10%"), 20.0);
        assert_close(value("18%"), 0.18);
    }

    #[test]
    fn test_functions_and_constants() {
        assert_eq!(value("sqrt(16)"), 4.0);
        assert_close(value("log10(1000)"), 3.0);
        assert_close(value("log(E)"), 1.0);
        assert_eq!(value("sin(0)"), 0.0);
        assert_eq!(value("cos(0)"), 1.0);
        assert_close(value("tan(PI/4)"), 1.0);
        assert_eq!(value("PI"), std::f64::consts::PI);
        assert_eq!(value("E"), std::f64::consts::E);
    }

    #[test]
    fn test_qualified_names_accepted_directly() {
        assert_eq!(value("Math.sqrt(81)"), 9.0);
    }

    #[test]
    fn test_unary_signs() {
        assert_eq!(value("-5 + 10"), 5.0);
        assert_eq!(value("(-2)^2"), 4.0);
        assert_eq!(value("+3"), 3.0);
    }

    #[test]
    fn test_intermediate_infinity_allowed() {
        assert_eq!(value("1/(1/0)"), 0.0);
    }

    // ===== Failures =====

    #[test]
    fn test_division_by_zero_fails() {
        assert_eq!(evaluate("1/0"), Evaluation::Failure);
        assert_eq!(evaluate("0/0"), Evaluation::Failure);
    }

    #[test]
    fn test_non_finite_functions_fail() {
        assert!(evaluate("sqrt(-1)").is_failure());
        assert!(evaluate("log(0)").is_failure());
        assert!(evaluate("10^400").is_failure());
    }

    #[test]
    fn test_hostile_input_fails() {
        for input in [
            "alert(1)",
            "mylog(10)",
            "x=1",
            "1;2",
            "Math.constructor",
            "Math.sqrt.call(0,4)",
            "this",
            "[1,2]",
            "\"2\"+2",
            "sqrt",
        ] {
            assert!(evaluate(input).is_failure(), "{input} should fail");
        }
    }

    #[test]
    fn test_malformed_fails() {
        for input in ["", "   ", "(1+2", "1+2)", "2+", "1..2", "-2^2", "5--2", "(5)%"] {
            assert!(evaluate(input).is_failure(), "{input} should fail");
        }
    }

    #[test]
    fn test_deep_nesting_fails_without_overflow() {
        let n = 100_000;
        let parens = format!("{}1{}", "(".repeat(n), ")".repeat(n));
        assert_eq!(evaluate(&parens), Evaluation::Failure);
        assert_eq!(evaluate(&format!("{}1", "- ".repeat(n))), Evaluation::Failure);
        assert_eq!(evaluate(&format!("1{}", "+1".repeat(n))), Evaluation::Failure);
        assert_eq!(evaluate(&format!("2{}", "^1".repeat(n))), Evaluation::Failure);
    }

    #[test]
    fn test_moderate_nesting_evaluates() {
        let n = 200;
        assert_eq!(value(&format!("{}7{}", "(".repeat(n), ")".repeat(n))), 7.0);
        assert_eq!(value(&format!("{}7", "- ".repeat(200))), 7.0);
    }

    #[test]
    fn test_try_evaluate_reports_reason() {
        let eval = Evaluator::new();
        assert_eq!(eval.try_evaluate(""), Err(CalcError::EmptyExpression));
        assert_eq!(
            eval.try_evaluate("mylog(10)"),
            Err(CalcError::UnknownIdentifier("mylog".into()))
        );
        assert!(matches!(
            eval.try_evaluate("1/0"),
            Err(CalcError::NonFinite(v)) if v.is_infinite()
        ));
    }

    #[test]
    fn test_custom_namespace_prefix() {
        let eval = Evaluator::with_namespace(MathNamespace::with_prefix("M"));
        assert_eq!(eval.evaluate("sqrt(4)"), Evaluation::Value(2.0));
        assert_eq!(eval.namespace().prefix(), "M");
        assert!(eval.evaluate("Math.sqrt(4)").is_failure());
    }
}
