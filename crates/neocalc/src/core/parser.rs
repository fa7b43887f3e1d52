//! Strict tokenizer and recursive-descent parser
//!
//! Accepts only numerals, `+ - * / **`, parentheses, and qualified members
//! of the [`MathNamespace`]. Every other character or identifier is rejected
//! before any evaluation happens.

use crate::core::namespace::{MathConstant, MathFunction, MathNamespace};
use crate::core::{CalcError, CalcResult, Operation};

/// Token types from lexical analysis
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal
    Number(f64),
    /// `+ - * / **`
    Operator(Operation),
    /// Qualified namespace function, e.g. `Math.sqrt`
    Function(MathFunction),
    /// Qualified namespace constant, e.g. `Math.PI`
    Constant(MathConstant),
    /// Left parenthesis
    LeftParen,
    /// Right parenthesis
    RightParen,
}

/// Abstract Syntax Tree node
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// Numeric literal
    Number(f64),
    /// Namespace constant
    Constant(MathConstant),
    /// Binary operation
    BinaryOp {
        /// Left operand
        left: Box<AstNode>,
        /// Operator
        op: Operation,
        /// Right operand
        right: Box<AstNode>,
    },
    /// Unary negation
    Negate(Box<AstNode>),
    /// Call of a namespace function with one argument
    Call {
        /// Function being called
        function: MathFunction,
        /// Argument expression
        argument: Box<AstNode>,
    },
}

impl AstNode {
    /// Creates a new number node
    #[must_use]
    pub fn number(value: f64) -> Self {
        Self::Number(value)
    }

    /// Creates a new binary operation node
    #[must_use]
    pub fn binary(left: AstNode, op: Operation, right: AstNode) -> Self {
        Self::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Creates a new negation node
    #[must_use]
    pub fn negate(inner: AstNode) -> Self {
        Self::Negate(Box::new(inner))
    }

    /// Creates a new function call node
    #[must_use]
    pub fn call(function: MathFunction, argument: AstNode) -> Self {
        Self::Call {
            function,
            argument: Box::new(argument),
        }
    }
}

/// Tokenizer for converting normalized expressions to tokens
#[derive(Debug)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    namespace: &'a MathNamespace,
}

impl<'a> Tokenizer<'a> {
    /// Creates a new tokenizer for the given input
    #[must_use]
    pub fn new(input: &'a str, namespace: &'a MathNamespace) -> Self {
        Self {
            input,
            pos: 0,
            namespace,
        }
    }

    /// Tokenizes the entire input
    pub fn tokenize(&mut self) -> CalcResult<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Returns the next token, or None if at end of input
    pub fn next_token(&mut self) -> CalcResult<Option<Token>> {
        self.skip_whitespace();

        let Some(ch) = self.current_char() else {
            return Ok(None);
        };

        let token = match ch {
            '0'..='9' | '.' => self.read_number()?,
            '+' | '-' => {
                self.advance();
                if self.current_char() == Some(ch) {
                    return Err(CalcError::UnsupportedOperator(format!("{ch}{ch}")));
                }
                if ch == '+' {
                    Token::Operator(Operation::Add)
                } else {
                    Token::Operator(Operation::Subtract)
                }
            }
            '*' => {
                self.advance();
                if self.current_char() == Some('*') {
                    self.advance();
                    Token::Operator(Operation::Power)
                } else {
                    Token::Operator(Operation::Multiply)
                }
            }
            '/' => {
                self.advance();
                Token::Operator(Operation::Divide)
            }
            '(' => {
                self.advance();
                Token::LeftParen
            }
            ')' => {
                self.advance();
                Token::RightParen
            }
            c if is_identifier_start(c) => self.read_qualified_name()?,
            _ => return Err(CalcError::UnexpectedCharacter(ch)),
        };

        Ok(Some(token))
    }

    fn current_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.pos += ch.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn consume_digits(&mut self) {
        while self.current_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    /// Digits with at most one decimal point, then an optional exponent
    fn read_number(&mut self) -> CalcResult<Token> {
        let start = self.pos;

        self.consume_digits();
        if self.current_char() == Some('.') {
            self.advance();
            self.consume_digits();
        }
        if matches!(self.current_char(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.current_char(), Some('+' | '-')) {
                self.advance();
            }
            self.consume_digits();
        }

        let literal = &self.input[start..self.pos];
        let value: f64 = literal
            .parse()
            .map_err(|_| CalcError::InvalidNumber(literal.to_string()))?;

        Ok(Token::Number(value))
    }

    fn read_identifier(&mut self) -> &'a str {
        let input = self.input;
        let start = self.pos;
        while self.current_char().is_some_and(is_identifier_part) {
            self.advance();
        }
        &input[start..self.pos]
    }

    /// `<prefix>.<member>`; bare identifiers and unknown members are rejected
    fn read_qualified_name(&mut self) -> CalcResult<Token> {
        let head = self.read_identifier();
        if head != self.namespace.prefix() || self.current_char() != Some('.') {
            return Err(CalcError::UnknownIdentifier(head.to_string()));
        }
        self.advance();

        if !self.current_char().is_some_and(is_identifier_start) {
            return Err(CalcError::UnknownIdentifier(format!("{head}.")));
        }
        let member = self.read_identifier();

        if let Some(function) = self.namespace.function(member) {
            Ok(Token::Function(function))
        } else if let Some(constant) = self.namespace.constant(member) {
            Ok(Token::Constant(constant))
        } else {
            Err(CalcError::UnknownIdentifier(format!("{head}.{member}")))
        }
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Recursive descent parser for normalized expressions
///
/// Grammar:
/// ```text
/// expression ::= term (('+' | '-') term)*
/// term       ::= power (('*' | '/') power)*
/// power      ::= unary | primary ('**' power)?   // right associative
/// unary      ::= ('+' | '-') unary | primary
/// primary    ::= NUMBER | CONSTANT | FUNCTION '(' expression ')'
///              | '(' expression ')'
/// ```
///
/// A signed operand directly left of `**` is rejected: `-2**2` is ambiguous,
/// `(-2)**2` and `2**-1` are fine.
///
/// Tree depth is capped at [`Parser::MAX_DEPTH`]: every parenthesis, sign,
/// exponent and chained binary operator counts one level.
#[derive(Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    /// Creates a new parser from tokens
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Maximum nesting depth of the parsed tree
    pub const MAX_DEPTH: usize = 256;

    /// Tokenizes and parses a normalized expression
    pub fn parse_str(input: &str, namespace: &MathNamespace) -> CalcResult<AstNode> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CalcError::EmptyExpression);
        }

        let tokens = Tokenizer::new(trimmed, namespace).tokenize()?;
        Self::new(tokens).parse()
    }

    /// Parses all tokens into an AST
    pub fn parse(&mut self) -> CalcResult<AstNode> {
        if self.tokens.is_empty() {
            return Err(CalcError::EmptyExpression);
        }

        let ast = self.parse_expression()?;

        if let Some(token) = self.current() {
            return Err(CalcError::parse(format!(
                "Unexpected token {token:?} at position {}",
                self.pos
            )));
        }

        Ok(ast)
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn descend(&mut self) -> CalcResult<()> {
        if self.depth >= Self::MAX_DEPTH {
            return Err(CalcError::parse("Expression nested too deeply"));
        }
        self.depth += 1;
        Ok(())
    }

    fn ascend(&mut self, levels: usize) {
        self.depth -= levels;
    }

    fn at_operator(&self, op: Operation) -> bool {
        matches!(self.current(), Some(Token::Operator(o)) if *o == op)
    }

    fn parse_expression(&mut self) -> CalcResult<AstNode> {
        let mut left = self.parse_term()?;
        let mut chained = 0;

        while let Some(Token::Operator(op @ (Operation::Add | Operation::Subtract))) =
            self.current()
        {
            let op = *op;
            self.advance();
            self.descend()?;
            chained += 1;
            let right = self.parse_term()?;
            left = AstNode::binary(left, op, right);
        }

        self.ascend(chained);
        Ok(left)
    }

    fn parse_term(&mut self) -> CalcResult<AstNode> {
        let mut left = self.parse_power()?;
        let mut chained = 0;

        while let Some(Token::Operator(op @ (Operation::Multiply | Operation::Divide))) =
            self.current()
        {
            let op = *op;
            self.advance();
            self.descend()?;
            chained += 1;
            let right = self.parse_power()?;
            left = AstNode::binary(left, op, right);
        }

        self.ascend(chained);
        Ok(left)
    }

    fn parse_power(&mut self) -> CalcResult<AstNode> {
        if self.at_operator(Operation::Add) || self.at_operator(Operation::Subtract) {
            let operand = self.parse_unary()?;
            if self.at_operator(Operation::Power) {
                return Err(CalcError::parse(
                    "Unary operator before '**' needs parentheses",
                ));
            }
            return Ok(operand);
        }

        let base = self.parse_primary()?;

        if self.at_operator(Operation::Power) {
            self.advance();
            self.descend()?;
            let exponent = self.parse_power()?;
            self.ascend(1);
            return Ok(AstNode::binary(base, Operation::Power, exponent));
        }

        Ok(base)
    }

    fn parse_unary(&mut self) -> CalcResult<AstNode> {
        let negate = if self.at_operator(Operation::Subtract) {
            true
        } else if self.at_operator(Operation::Add) {
            false
        } else {
            return self.parse_primary();
        };

        self.advance();
        self.descend()?;
        let operand = self.parse_unary()?;
        self.ascend(1);
        Ok(if negate {
            AstNode::negate(operand)
        } else {
            operand
        })
    }

    fn parse_primary(&mut self) -> CalcResult<AstNode> {
        let token = self
            .advance()
            .ok_or_else(|| CalcError::parse("Unexpected end of expression"))?;

        match token {
            Token::Number(n) => Ok(AstNode::number(n)),
            Token::Constant(c) => Ok(AstNode::Constant(c)),
            Token::Function(function) => {
                self.expect_left_paren(function.name())?;
                let argument = self.parse_parenthesized()?;
                Ok(AstNode::call(function, argument))
            }
            Token::LeftParen => self.parse_parenthesized(),
            other => Err(CalcError::parse(format!("Unexpected token: {other:?}"))),
        }
    }

    fn expect_left_paren(&mut self, function: &str) -> CalcResult<()> {
        match self.advance() {
            Some(Token::LeftParen) => Ok(()),
            _ => Err(CalcError::parse(format!("Expected '(' after {function}"))),
        }
    }

    /// Parses `expression ')'`, the opening parenthesis already consumed
    fn parse_parenthesized(&mut self) -> CalcResult<AstNode> {
        self.descend()?;
        let expr = self.parse_expression()?;
        self.ascend(1);
        match self.advance() {
            Some(Token::RightParen) => Ok(expr),
            Some(t) => Err(CalcError::parse(format!("Expected ')' but found {t:?}"))),
            None => Err(CalcError::parse("Unclosed parenthesis")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns() -> MathNamespace {
        MathNamespace::new()
    }

    fn tokenize(input: &str) -> CalcResult<Vec<Token>> {
        let ns = ns();
        Tokenizer::new(input, &ns).tokenize()
    }

    fn parse(input: &str) -> CalcResult<AstNode> {
        Parser::parse_str(input, &ns())
    }

    // ===== Tokenizer tests =====

    #[test]
    fn test_tokenize_numbers() {
        assert_eq!(tokenize("42").unwrap(), vec![Token::Number(42.0)]);
        assert_eq!(tokenize("3.14").unwrap(), vec![Token::Number(3.14)]);
        assert_eq!(tokenize(".5").unwrap(), vec![Token::Number(0.5)]);
        assert_eq!(tokenize("5.").unwrap(), vec![Token::Number(5.0)]);
    }

    #[test]
    fn test_tokenize_exponent_literals() {
        assert_eq!(tokenize("1e5").unwrap(), vec![Token::Number(1e5)]);
        assert_eq!(tokenize("2.5E-3").unwrap(), vec![Token::Number(2.5e-3)]);
    }

    #[test]
    fn test_tokenize_bad_literals() {
        assert!(matches!(tokenize("."), Err(CalcError::InvalidNumber(_))));
        assert!(matches!(tokenize("1e"), Err(CalcError::InvalidNumber(_))));
        assert!(matches!(tokenize("2E"), Err(CalcError::InvalidNumber(_))));
    }

    #[test]
    fn test_tokenize_operators() {
        assert_eq!(
            tokenize("+ - * / **").unwrap(),
            vec![
                Token::Operator(Operation::Add),
                Token::Operator(Operation::Subtract),
                Token::Operator(Operation::Multiply),
                Token::Operator(Operation::Divide),
                Token::Operator(Operation::Power),
            ]
        );
    }

    #[test]
    fn test_tokenize_increment_rejected() {
        assert!(matches!(
            tokenize("5--2"),
            Err(CalcError::UnsupportedOperator(_))
        ));
        assert!(matches!(
            tokenize("5++2"),
            Err(CalcError::UnsupportedOperator(_))
        ));
        assert!(tokenize("5 - -2").is_ok());
    }

    #[test]
    fn test_tokenize_qualified_members() {
        assert_eq!(
            tokenize("Math.sqrt(Math.PI)").unwrap(),
            vec![
                Token::Function(MathFunction::Sqrt),
                Token::LeftParen,
                Token::Constant(MathConstant::Pi),
                Token::RightParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_bare_identifier_rejected() {
        assert_eq!(
            tokenize("alert(1)"),
            Err(CalcError::UnknownIdentifier("alert".into()))
        );
        assert_eq!(
            tokenize("sqrt(4)"),
            Err(CalcError::UnknownIdentifier("sqrt".into()))
        );
    }

    #[test]
    fn test_tokenize_unknown_member_rejected() {
        assert_eq!(
            tokenize("Math.constructor"),
            Err(CalcError::UnknownIdentifier("Math.constructor".into()))
        );
        assert_eq!(
            tokenize("Math.random()"),
            Err(CalcError::UnknownIdentifier("Math.random".into()))
        );
        assert!(matches!(
            tokenize("Math"),
            Err(CalcError::UnknownIdentifier(_))
        ));
        assert!(matches!(
            tokenize("Math.(1)"),
            Err(CalcError::UnknownIdentifier(_))
        ));
    }

    #[test]
    fn test_tokenize_rejects_statement_syntax() {
        for input in ["x=1", "1;2", "[1]", "{}", "'a'", "1,2", "a.b", "1%2", "1^2"] {
            assert!(tokenize(input).is_err(), "{input} should be rejected");
        }
    }

    #[test]
    fn test_tokenize_unicode_char_rejected() {
        assert_eq!(tokenize("2 × 3"), Err(CalcError::UnexpectedCharacter('×')));
    }

    #[test]
    fn test_tokenize_whitespace_only() {
        assert!(tokenize("   ").unwrap().is_empty());
    }

    // ===== Parser tests =====

    #[test]
    fn test_parse_single_number() {
        assert_eq!(parse("42").unwrap(), AstNode::Number(42.0));
    }

    #[test]
    fn test_parse_precedence_mul_over_add() {
        assert_eq!(
            parse("2 + 3 * 4").unwrap(),
            AstNode::binary(
                AstNode::number(2.0),
                Operation::Add,
                AstNode::binary(
                    AstNode::number(3.0),
                    Operation::Multiply,
                    AstNode::number(4.0)
                )
            )
        );
    }

    #[test]
    fn test_parse_left_associative_subtraction() {
        assert_eq!(
            parse("8 - 3 - 2").unwrap(),
            AstNode::binary(
                AstNode::binary(
                    AstNode::number(8.0),
                    Operation::Subtract,
                    AstNode::number(3.0)
                ),
                Operation::Subtract,
                AstNode::number(2.0)
            )
        );
    }

    #[test]
    fn test_parse_power_right_associative() {
        assert_eq!(
            parse("2 ** 3 ** 2").unwrap(),
            AstNode::binary(
                AstNode::number(2.0),
                Operation::Power,
                AstNode::binary(AstNode::number(3.0), Operation::Power, AstNode::number(2.0))
            )
        );
    }

    #[test]
    fn test_parse_power_binds_tighter_than_multiply() {
        match parse("2 * 3 ** 2").unwrap() {
            AstNode::BinaryOp {
                op: Operation::Multiply,
                ..
            } => {}
            other => panic!("Expected Multiply at top level, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_unary_minus() {
        assert_eq!(parse("-5").unwrap(), AstNode::negate(AstNode::number(5.0)));
        assert_eq!(
            parse("- -5").unwrap(),
            AstNode::negate(AstNode::negate(AstNode::number(5.0)))
        );
    }

    #[test]
    fn test_parse_unary_plus_is_identity() {
        assert_eq!(parse("+5").unwrap(), AstNode::number(5.0));
    }

    #[test]
    fn test_parse_unary_before_power_rejected() {
        assert!(matches!(parse("-2 ** 2"), Err(CalcError::Parse(_))));
        assert!(matches!(parse("2 ** -1 ** 2"), Err(CalcError::Parse(_))));
    }

    #[test]
    fn test_parse_negative_exponent() {
        assert_eq!(
            parse("2 ** -1").unwrap(),
            AstNode::binary(
                AstNode::number(2.0),
                Operation::Power,
                AstNode::negate(AstNode::number(1.0))
            )
        );
    }

    #[test]
    fn test_parse_parenthesized_negative_base() {
        assert_eq!(
            parse("(-2) ** 2").unwrap(),
            AstNode::binary(
                AstNode::negate(AstNode::number(2.0)),
                Operation::Power,
                AstNode::number(2.0)
            )
        );
    }

    #[test]
    fn test_parse_function_call() {
        assert_eq!(
            parse("Math.sqrt(16)").unwrap(),
            AstNode::call(MathFunction::Sqrt, AstNode::number(16.0))
        );
    }

    #[test]
    fn test_parse_function_requires_call() {
        assert!(matches!(parse("Math.sqrt"), Err(CalcError::Parse(_))));
        assert!(matches!(parse("Math.sqrt 4"), Err(CalcError::Parse(_))));
        assert!(matches!(parse("Math.sqrt()"), Err(CalcError::Parse(_))));
    }

    #[test]
    fn test_parse_constant_not_callable() {
        assert!(matches!(parse("Math.PI(2)"), Err(CalcError::Parse(_))));
    }

    #[test]
    fn test_parse_empty_expression() {
        assert_eq!(parse(""), Err(CalcError::EmptyExpression));
        assert_eq!(parse("   "), Err(CalcError::EmptyExpression));
    }

    #[test]
    fn test_parse_unbalanced_parens() {
        assert!(matches!(parse("(2 + 3"), Err(CalcError::Parse(_))));
        assert!(matches!(parse("2 + 3)"), Err(CalcError::Parse(_))));
        assert!(matches!(parse("()"), Err(CalcError::Parse(_))));
    }

    #[test]
    fn test_parse_dangling_operators() {
        assert!(matches!(parse("2 +"), Err(CalcError::Parse(_))));
        assert!(matches!(parse("2 + * 3"), Err(CalcError::Parse(_))));
        assert!(matches!(parse("* 3"), Err(CalcError::Parse(_))));
    }

    #[test]
    fn test_parse_adjacent_operands_rejected() {
        assert!(matches!(parse("1.2.3"), Err(CalcError::Parse(_))));
        assert!(matches!(parse("2(3)"), Err(CalcError::Parse(_))));
        assert!(matches!(parse("2 Math.PI"), Err(CalcError::Parse(_))));
    }

    #[test]
    fn test_parser_parse_empty_tokens() {
        let mut parser = Parser::new(vec![]);
        assert_eq!(parser.parse(), Err(CalcError::EmptyExpression));
    }

    // ===== Nesting limit =====

    fn too_deep(input: &str) -> bool {
        matches!(parse(input), Err(CalcError::Parse(msg)) if msg.contains("nested too deeply"))
    }

    #[test]
    fn test_nesting_within_limit() {
        let n = 100;
        let input = format!("{}1{}", "(".repeat(n), ")".repeat(n));
        assert!(parse(&input).is_ok());
        assert!(parse(&format!("{}1", "- ".repeat(n))).is_ok());
    }

    #[test]
    fn test_sibling_groups_do_not_accumulate() {
        let input = vec!["((1))"; 100].join("*");
        assert!(parse(&input).is_ok());
    }

    #[test]
    fn test_deep_parentheses_rejected() {
        let n = 100_000;
        assert!(too_deep(&format!("{}1{}", "(".repeat(n), ")".repeat(n))));
        assert!(too_deep(&format!("{}1", "(".repeat(n))));
    }

    #[test]
    fn test_deep_function_calls_rejected() {
        let n = 10_000;
        assert!(too_deep(&format!(
            "{}1{}",
            "Math.sqrt(".repeat(n),
            ")".repeat(n)
        )));
    }

    #[test]
    fn test_long_unary_chain_rejected() {
        assert!(too_deep(&format!("{}1", "- ".repeat(100_000))));
        assert!(too_deep(&format!("{}1", "+ ".repeat(100_000))));
    }

    #[test]
    fn test_long_power_chain_rejected() {
        assert!(too_deep(&format!("1{}", "**1".repeat(100_000))));
    }

    #[test]
    fn test_long_operator_chain_rejected() {
        assert!(too_deep(&format!("1{}", "+1".repeat(100_000))));
        assert!(too_deep(&format!("1{}", "*1".repeat(100_000))));
        assert!(parse(&format!("1{}", "+1".repeat(Parser::MAX_DEPTH))).is_ok());
    }
}
