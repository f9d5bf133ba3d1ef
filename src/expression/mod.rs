//! Restricted arithmetic grammar: tokenizer, parser and evaluator

mod ast;
mod display;
mod errors;
mod eval;
mod lexer;
mod parser;

pub use ast::{Expression, Operator, Sign};
pub use errors::EvalError;
pub use lexer::{Spanned, Token, tokenize};
pub use parser::{MAX_DEPTH, MAX_OPERATORS, parse};
