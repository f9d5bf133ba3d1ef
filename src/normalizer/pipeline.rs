use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::normalizer::number_words::{NumberWordResolver, is_number_word};
use crate::normalizer::phrases::PhraseTable;

const SYMBOLS: &[&str] = &["+", "-", "*", "/", "(", ")", "%", "**"];

#[allow(clippy::expect_used)]
static SYMBOL_CHAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-+*/()%]").expect("symbol pattern is valid"));

#[allow(clippy::expect_used)]
static SPACED_DOT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d)(?:\s+\.\s*|\.\s+)(\d)").expect("dot pattern is valid")
});

fn is_symbol(token: &str) -> bool {
    SYMBOLS.contains(&token)
}

/// Rewrite spoken or typed arithmetic into a canonical symbolic expression.
///
/// `"five plus three times two"` becomes `"5 + 3 * 2"`. Words that are
/// neither operators nor numbers are kept as they are, so that evaluating
/// the result fails with the offending text visible instead of silently
/// dropping it.
pub fn normalize(raw: &str) -> String {
    normalize_with(raw, PhraseTable::builtin())
}

/// [`normalize`] with a caller-supplied phrase table
pub fn normalize_with(raw: &str, phrases: &PhraseTable) -> String {
    debug!("Normalizing: '{}'", raw);

    let text = raw
        .to_lowercase()
        .trim()
        .replace(',', "")
        .replace('×', "*")
        .replace('÷', "/")
        .replace('−', "-");
    let text = phrases.apply(&text);
    let text = SYMBOL_CHAR.replace_all(&text, " $0 ");

    let resolver = NumberWordResolver::new();
    let mut output: Vec<String> = Vec::new();
    let mut run: Vec<&str> = Vec::new();

    for token in text.split_whitespace() {
        if is_symbol(token) {
            flush_run(&resolver, &mut run, &mut output);
            output.push(token.to_string());
        } else {
            run.push(token);
        }
    }
    flush_run(&resolver, &mut run, &mut output);

    let expr = output.join(" ").replace("* *", "**");
    let expr = rejoin_decimals(expr);

    debug!("Normalized '{}' to '{}'", raw, expr);
    expr
}

/// Close up `1 . 5` into `1.5`; words around a dot are left apart
fn rejoin_decimals(mut expr: String) -> String {
    // matches can share a digit ("1 . 2 . 3"), so repeat until stable
    while SPACED_DOT.is_match(&expr) {
        expr = SPACED_DOT.replace_all(&expr, "${1}.${2}").into_owned();
    }
    expr
}

/// Turn the pending number run into one output token
fn flush_run(resolver: &NumberWordResolver, run: &mut Vec<&str>, output: &mut Vec<String>) {
    if run.is_empty() {
        return;
    }
    if run.iter().any(|t| is_number_word(t)) {
        output.push(resolver.resolve_or_passthrough(run.as_slice()));
    } else {
        // digits split apart by the recognizer, e.g. "1 2" -> "12"
        output.push(run.concat());
    }
    run.clear();
}
