use log::debug;

use crate::expression::ast::{Expression, Operator, Sign};
use crate::expression::errors::EvalError;
use crate::expression::lexer::{Spanned, Token, fragment_at, tokenize};

/// Deepest nesting of parentheses and unary signs accepted
pub const MAX_DEPTH: usize = 128;

/// Most binary operators accepted in one expression
pub const MAX_OPERATORS: usize = 1_000;

/// Parse a symbolic arithmetic expression into a tree.
///
/// Grammar, loosest to tightest:
///
/// ```text
/// additive       := multiplicative (("+" | "-") multiplicative)*
/// multiplicative := unary (("*" | "/" | "%") unary)*
/// unary          := ("+" | "-") unary | power
/// power          := primary ("**" unary)?
/// primary        := NUMBER | "(" additive ")"
/// ```
///
/// `**` binds tighter than a sign on its left, so `-2**2` is `-(2**2)`,
/// while its right operand may carry a sign of its own (`2**-1`).
///
/// # Errors
///
/// Returns [`EvalError::Syntax`] for empty input, unbalanced parentheses,
/// dangling operators, excessive nesting or more than [`MAX_OPERATORS`]
/// operators, and propagates
/// [`EvalError::DisallowedConstruct`] from the tokenizer.
pub fn parse(input: &str) -> Result<Expression, EvalError> {
    debug!("Parsing expression: '{}'", input);

    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(EvalError::syntax("", "empty expression"));
    }

    let mut parser = Parser {
        input,
        tokens: &tokens,
        pos: 0,
        depth: 0,
        operators: 0,
    };
    let expr = parser.parse_additive()?;

    if let Some(spanned) = parser.peek() {
        let message = match spanned.token {
            Token::RightParen => "unmatched `)`",
            Token::Number(_) => "missing operator before number",
            _ => "unexpected token",
        };
        return Err(EvalError::syntax(
            fragment_at(input, spanned.offset),
            message,
        ));
    }

    debug!("Parsed expression: {}", expr);
    Ok(expr)
}

struct Parser<'a> {
    input: &'a str,
    tokens: &'a [Spanned],
    pos: usize,
    depth: usize,
    operators: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Spanned> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Spanned> {
        let spanned = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(spanned)
    }

    fn peek_operator(&self) -> Option<Operator> {
        match self.peek() {
            Some(Spanned {
                token: Token::Operator(op),
                ..
            }) => Some(*op),
            _ => None,
        }
    }

    /// Fragment quoted when input ends where more was expected
    fn tail_fragment(&self) -> String {
        self.tokens
            .last()
            .map(|last| fragment_at(self.input, last.offset))
            .unwrap_or_default()
    }

    fn nested<T>(
        &mut self,
        offset: usize,
        f: impl FnOnce(&mut Self) -> Result<T, EvalError>,
    ) -> Result<T, EvalError> {
        if self.depth >= MAX_DEPTH {
            return Err(EvalError::syntax(
                fragment_at(self.input, offset),
                "expression nested too deeply",
            ));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Join two operands, keeping the tree within the operator budget
    fn join(
        &mut self,
        op: Operator,
        offset: usize,
        left: Expression,
        right: Expression,
    ) -> Result<Expression, EvalError> {
        if self.operators >= MAX_OPERATORS {
            return Err(EvalError::syntax(
                fragment_at(self.input, offset),
                "expression too long",
            ));
        }
        self.operators += 1;
        Ok(Expression::binary(op, left, right))
    }

    fn operator_offset(&self) -> usize {
        self.peek().map_or(self.input.len(), |s| s.offset)
    }

    fn parse_additive(&mut self) -> Result<Expression, EvalError> {
        let mut left = self.parse_multiplicative()?;
        while let Some(op) = self.peek_operator() {
            if !matches!(op, Operator::Add | Operator::Sub) {
                break;
            }
            let offset = self.operator_offset();
            self.advance();
            let right = self.parse_multiplicative()?;
            left = self.join(op, offset, left, right)?;
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expression, EvalError> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.peek_operator() {
            if !matches!(op, Operator::Mul | Operator::Div | Operator::Mod) {
                break;
            }
            let offset = self.operator_offset();
            self.advance();
            let right = self.parse_unary()?;
            left = self.join(op, offset, left, right)?;
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression, EvalError> {
        let sign = match self.peek_operator() {
            Some(Operator::Add) => Sign::Plus,
            Some(Operator::Sub) => Sign::Minus,
            _ => return self.parse_power(),
        };
        let offset = self.operator_offset();
        self.advance();
        let operand = self.nested(offset, Self::parse_unary)?;
        Ok(Expression::unary(sign, operand))
    }

    fn parse_power(&mut self) -> Result<Expression, EvalError> {
        let base = self.parse_primary()?;
        if self.peek_operator() != Some(Operator::Pow) {
            return Ok(base);
        }
        let offset = self.operator_offset();
        self.advance();
        let exponent = self.nested(offset, Self::parse_unary)?;
        self.join(Operator::Pow, offset, base, exponent)
    }

    fn parse_primary(&mut self) -> Result<Expression, EvalError> {
        let Some(spanned) = self.advance() else {
            return Err(EvalError::syntax(
                self.tail_fragment(),
                "unexpected end of expression",
            ));
        };

        match &spanned.token {
            Token::Number(text) => match text.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(Expression::literal(value)),
                Ok(_) => Err(EvalError::syntax(
                    fragment_at(self.input, spanned.offset),
                    "number too large",
                )),
                Err(_) => Err(EvalError::syntax(
                    fragment_at(self.input, spanned.offset),
                    "malformed number",
                )),
            },
            Token::LeftParen => {
                let inner = self.nested(spanned.offset, Self::parse_additive)?;
                match self.advance() {
                    Some(Spanned {
                        token: Token::RightParen,
                        ..
                    }) => Ok(inner),
                    _ => Err(EvalError::syntax(
                        fragment_at(self.input, spanned.offset),
                        "unclosed `(`",
                    )),
                }
            }
            Token::RightParen => Err(EvalError::syntax(
                fragment_at(self.input, spanned.offset),
                "expected a number before `)`",
            )),
            Token::Operator(op) => Err(EvalError::syntax(
                fragment_at(self.input, spanned.offset),
                format!("expected a number before `{}`", op),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(value: f64) -> Expression {
        Expression::literal(value)
    }

    #[test]
    fn test_parse_precedence() {
        let result = parse("1 + 2 * 3");
        assert_eq!(
            result,
            Ok(Expression::binary(
                Operator::Add,
                lit(1.0),
                Expression::binary(Operator::Mul, lit(2.0), lit(3.0)),
            ))
        );
    }

    #[test]
    fn test_parse_left_associative() {
        let result = parse("8 - 3 - 2");
        assert_eq!(
            result,
            Ok(Expression::binary(
                Operator::Sub,
                Expression::binary(Operator::Sub, lit(8.0), lit(3.0)),
                lit(2.0),
            ))
        );
    }

    #[test]
    fn test_parse_power_right_associative() {
        let result = parse("2 ** 3 ** 2");
        assert_eq!(
            result,
            Ok(Expression::binary(
                Operator::Pow,
                lit(2.0),
                Expression::binary(Operator::Pow, lit(3.0), lit(2.0)),
            ))
        );
    }

    #[test]
    fn test_parse_unary_minus_below_power() {
        let result = parse("-2 ** 2");
        assert_eq!(
            result,
            Ok(Expression::unary(
                Sign::Minus,
                Expression::binary(Operator::Pow, lit(2.0), lit(2.0)),
            ))
        );
    }

    #[test]
    fn test_parse_signed_exponent() {
        let result = parse("2 ** -1");
        assert_eq!(
            result,
            Ok(Expression::binary(
                Operator::Pow,
                lit(2.0),
                Expression::unary(Sign::Minus, lit(1.0)),
            ))
        );
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(parse(""), Err(EvalError::syntax("", "empty expression")));
        assert_eq!(parse("   "), Err(EvalError::syntax("", "empty expression")));
    }

    #[test]
    fn test_parse_unbalanced() {
        assert_eq!(
            parse("(1 + 2"),
            Err(EvalError::syntax("(1 + 2", "unclosed `(`"))
        );
        assert_eq!(
            parse("1 + 2)"),
            Err(EvalError::syntax(")", "unmatched `)`"))
        );
    }

    #[test]
    fn test_parse_trailing_operator() {
        assert_eq!(
            parse("5 +"),
            Err(EvalError::syntax("+", "unexpected end of expression"))
        );
    }

    #[test]
    fn test_parse_adjacent_numbers() {
        assert_eq!(
            parse("2 3"),
            Err(EvalError::syntax("3", "missing operator before number"))
        );
    }

    #[test]
    fn test_parse_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert!(matches!(parse(&deep), Err(EvalError::Syntax { .. })));

        let ok = format!("{}1{}", "(".repeat(MAX_DEPTH - 1), ")".repeat(MAX_DEPTH - 1));
        assert_eq!(parse(&ok), Ok(lit(1.0)));

        let signs = format!("{}1", "-".repeat(MAX_DEPTH + 1));
        assert!(matches!(parse(&signs), Err(EvalError::Syntax { .. })));
    }

    #[test]
    fn test_parse_operator_limit() {
        let long = format!("1{}", " + 1".repeat(20_000));
        let result = parse(&long);
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(matches!(&e, EvalError::Syntax { message, .. } if message == "expression too long"));
        }

        let mixed = format!("2{}", " * 3 - 1".repeat(5_000));
        assert!(matches!(parse(&mixed), Err(EvalError::Syntax { .. })));

        let at_limit = format!("1{}", " + 1".repeat(MAX_OPERATORS));
        assert!(parse(&at_limit).is_ok());
        assert!(crate::evaluate(&at_limit) == Ok((MAX_OPERATORS + 1) as f64));
    }

    #[test]
    fn test_parse_huge_literal() {
        let huge = format!("1{}", "0".repeat(400));
        let result = parse(&huge);
        assert!(result.is_err());
        if let Err(e) = result {
            assert_eq!(e.kind(), "SyntaxError");
            assert!(matches!(&e, EvalError::Syntax { message, .. } if message == "number too large"));
        }
        assert!(parse(&format!("1{}", "0".repeat(300))).is_ok());
    }
}
