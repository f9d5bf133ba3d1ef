//! Voicecalc - turn spoken or typed arithmetic into a number, safely
//!
//! Text such as "five plus three times two" is first normalized into a
//! canonical symbolic expression (`5 + 3 * 2`), which is then parsed by a
//! grammar that only knows numbers, six operators, signs and parentheses,
//! and evaluated. Nothing in the input can name a variable, call a function
//! or otherwise run code.

pub mod batch;
pub mod expression;
pub mod normalizer;

// Re-export the main public API
pub use batch::{Mode, TurnOutcome, evaluate_turn, evaluate_turns};
pub use expression::{EvalError, Expression, Operator, Sign, Token, parse, tokenize};
pub use normalizer::{NumberWordError, NumberWordResolver, PhraseTable, normalize};

/// Parse and evaluate a symbolic arithmetic expression
///
/// Accepts numbers, `+ - * / % **`, unary signs and parentheses. `/` is true
/// division, `%` keeps the sign of the dividend and `**` binds tighter than a
/// leading minus, so `-2**2` is `-4`.
///
/// # Errors
///
/// * [`EvalError::Syntax`] - empty input, unbalanced parentheses, dangling
///   operators
/// * [`EvalError::DisallowedConstruct`] - names, calls, strings, comparisons
///   and anything else that is not arithmetic
/// * [`EvalError::DivisionByZero`] - the right side of `/` or `%` is zero
///
/// # Examples
///
/// ```
/// use voicecalc::{EvalError, evaluate, normalize};
///
/// let expr = normalize("five plus three times two");
/// assert_eq!(expr, "5 + 3 * 2");
/// assert_eq!(evaluate(&expr), Ok(11.0));
///
/// assert_eq!(evaluate("1/0"), Err(EvalError::DivisionByZero));
/// assert!(matches!(
///     evaluate("import os"),
///     Err(EvalError::DisallowedConstruct { .. })
/// ));
/// ```
pub fn evaluate(expr: &str) -> Result<f64, EvalError> {
    parse(expr)?.evaluate()
}
