use std::iter::Peekable;
use std::str::CharIndices;

use log::trace;

use crate::expression::ast::Operator;
use crate::expression::errors::EvalError;

/// Lexical unit of a canonical symbolic expression
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Literal text of an integer or decimal number, e.g. `12` or `0.5`
    Number(String),
    Operator(Operator),
    LeftParen,
    RightParen,
}

/// A token together with the byte offset where it starts in the input
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub offset: usize,
}

const FRAGMENT_LEN: usize = 24;

const KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "class", "def", "del", "elif", "else", "except",
    "for", "from", "global", "if", "import", "in", "is", "lambda", "not", "or", "pass", "raise",
    "return", "try", "while", "with", "yield",
];

/// Text quoted back to the user when something at `offset` cannot be handled
pub(crate) fn fragment_at(input: &str, offset: usize) -> String {
    input
        .get(offset..)
        .unwrap_or_default()
        .trim()
        .chars()
        .take(FRAGMENT_LEN)
        .collect()
}

/// Split a symbolic expression into tokens.
///
/// Keypad glyphs `×`, `÷` and `−` are read as `*`, `/` and `-`.
///
/// # Errors
///
/// Returns [`EvalError::DisallowedConstruct`] for anything that looks like a
/// non-arithmetic construct (names, calls, strings, comparisons...) and
/// [`EvalError::Syntax`] for malformed numbers or stray characters.
pub fn tokenize(input: &str) -> Result<Vec<Spanned>, EvalError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let token = match c {
            '.' if starts_name(input.get(offset + 1..).unwrap_or_default()) => {
                return Err(EvalError::disallowed("attribute access"));
            }
            '0'..='9' | '.' => Token::Number(lex_number(input, &mut chars)?),
            '+' => {
                chars.next();
                Token::Operator(Operator::Add)
            }
            '-' | '−' => {
                chars.next();
                Token::Operator(Operator::Sub)
            }
            '*' => {
                chars.next();
                if chars.next_if(|&(_, next)| next == '*').is_some() {
                    Token::Operator(Operator::Pow)
                } else {
                    Token::Operator(Operator::Mul)
                }
            }
            '×' => {
                chars.next();
                Token::Operator(Operator::Mul)
            }
            '/' => {
                chars.next();
                if chars.next_if(|&(_, next)| next == '/').is_some() {
                    return Err(EvalError::disallowed("floor division `//`"));
                }
                Token::Operator(Operator::Div)
            }
            '÷' => {
                chars.next();
                Token::Operator(Operator::Div)
            }
            '%' => {
                chars.next();
                Token::Operator(Operator::Mod)
            }
            '(' => {
                chars.next();
                Token::LeftParen
            }
            ')' => {
                chars.next();
                Token::RightParen
            }
            c if c.is_alphabetic() || c == '_' => return Err(lex_word(input, &mut chars)),
            other => return Err(classify_symbol(input, offset, other)),
        };

        trace!("Token at {}: {:?}", offset, token);
        tokens.push(Spanned { token, offset });
    }

    Ok(tokens)
}

fn starts_name(text: &str) -> bool {
    text.chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
}

fn lex_number(input: &str, chars: &mut Peekable<CharIndices>) -> Result<String, EvalError> {
    let start = chars.peek().map_or(input.len(), |&(i, _)| i);
    let mut end = start;
    let mut seen_dot = false;
    let mut seen_digit = false;

    while let Some(&(i, c)) = chars.peek() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            '.' => {
                return Err(EvalError::syntax(
                    fragment_at(input, start),
                    "malformed number",
                ));
            }
            _ => break,
        }
        end = i + c.len_utf8();
        chars.next();
    }

    if !seen_digit {
        return Err(EvalError::syntax(
            fragment_at(input, start),
            "malformed number",
        ));
    }

    Ok(input.get(start..end).unwrap_or_default().to_string())
}

/// Consume a name and report what kind of construct it starts
fn lex_word(input: &str, chars: &mut Peekable<CharIndices>) -> EvalError {
    let start = chars.peek().map_or(input.len(), |&(i, _)| i);
    let mut end = start;
    while let Some(&(i, c)) = chars.peek() {
        if !(c.is_alphanumeric() || c == '_') {
            break;
        }
        end = i + c.len_utf8();
        chars.next();
    }
    let name = input.get(start..end).unwrap_or_default();
    let after = input.get(end..).unwrap_or_default();
    let rest = after.trim_start();

    let construct = if KEYWORDS.contains(&name) {
        format!("keyword `{}`", name)
    } else if rest.starts_with('(') {
        format!("function call `{}(...)`", name)
    } else if rest.starts_with('[') {
        format!("subscript `{}[...]`", name)
    } else if after.starts_with('.') {
        format!("attribute access on `{}`", name)
    } else if rest.starts_with('=') && !rest.starts_with("==") {
        format!("assignment to `{}`", name)
    } else {
        format!("identifier `{}`", name)
    };

    EvalError::disallowed(construct)
}

fn classify_symbol(input: &str, offset: usize, c: char) -> EvalError {
    let rest = input.get(offset..).unwrap_or_default();
    match c {
        '"' | '\'' => EvalError::disallowed("string literal"),
        '[' => EvalError::disallowed("list literal"),
        '{' => EvalError::disallowed("collection literal"),
        ',' => EvalError::disallowed("tuple"),
        '=' if rest.starts_with("==") => EvalError::disallowed("comparison `==`"),
        '=' => EvalError::disallowed("assignment"),
        '<' | '>' | '!' => EvalError::disallowed(format!("comparison `{}`", c)),
        '&' | '|' | '^' | '~' => EvalError::disallowed(format!("bitwise operator `{}`", c)),
        '@' => EvalError::disallowed("matrix multiplication `@`"),
        _ => EvalError::syntax(fragment_at(input, offset), "unexpected character"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        tokenize(input)
            .map(|tokens| tokens.into_iter().map(|s| s.token).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_tokenize_power_and_multiply() {
        assert_eq!(
            kinds("2**3*4"),
            vec![
                Token::Number("2".to_string()),
                Token::Operator(Operator::Pow),
                Token::Number("3".to_string()),
                Token::Operator(Operator::Mul),
                Token::Number("4".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_keypad_glyphs() {
        assert_eq!(
            kinds("6 × 2 ÷ 3 − 1"),
            vec![
                Token::Number("6".to_string()),
                Token::Operator(Operator::Mul),
                Token::Number("2".to_string()),
                Token::Operator(Operator::Div),
                Token::Number("3".to_string()),
                Token::Operator(Operator::Sub),
                Token::Number("1".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_decimals() {
        assert_eq!(
            kinds(".5 + 2."),
            vec![
                Token::Number(".5".to_string()),
                Token::Operator(Operator::Add),
                Token::Number("2.".to_string()),
            ]
        );
    }

    #[test]
    fn test_offsets_are_byte_positions() {
        let result = tokenize("(1 +  22)");
        assert!(result.is_ok());
        if let Ok(tokens) = result {
            let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
            assert_eq!(offsets, vec![0, 1, 3, 6, 8]);
        }
    }

    #[test]
    fn test_malformed_numbers() {
        assert!(matches!(tokenize("1.2.3"), Err(EvalError::Syntax { .. })));
        assert!(matches!(tokenize("1 + ."), Err(EvalError::Syntax { .. })));
    }

    #[test]
    fn test_names_are_disallowed() {
        assert_eq!(
            tokenize("import os"),
            Err(EvalError::disallowed("keyword `import`"))
        );
        assert_eq!(
            tokenize("abs(-3)"),
            Err(EvalError::disallowed("function call `abs(...)`"))
        );
        assert_eq!(
            tokenize("x[0]"),
            Err(EvalError::disallowed("subscript `x[...]`"))
        );
        assert_eq!(
            tokenize("2 * pi"),
            Err(EvalError::disallowed("identifier `pi`"))
        );
        assert_eq!(
            tokenize("os.system"),
            Err(EvalError::disallowed("attribute access on `os`"))
        );
        assert_eq!(
            tokenize("two . five"),
            Err(EvalError::disallowed("identifier `two`"))
        );
    }

    #[test]
    fn test_non_arithmetic_symbols() {
        assert_eq!(tokenize("'a'"), Err(EvalError::disallowed("string literal")));
        assert_eq!(tokenize("[1, 2]"), Err(EvalError::disallowed("list literal")));
        assert_eq!(
            tokenize("1 == 1"),
            Err(EvalError::disallowed("comparison `==`"))
        );
        assert_eq!(
            tokenize("1 < 2"),
            Err(EvalError::disallowed("comparison `<`"))
        );
        assert_eq!(
            tokenize("2 ^ 3"),
            Err(EvalError::disallowed("bitwise operator `^`"))
        );
        assert_eq!(
            tokenize("7 // 2"),
            Err(EvalError::disallowed("floor division `//`"))
        );
        assert!(matches!(tokenize("1 # 2"), Err(EvalError::Syntax { .. })));
    }
}
