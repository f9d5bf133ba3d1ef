//! Evaluate many independent turns at once

use log::debug;
use rayon::prelude::*;

use crate::expression::EvalError;
use crate::normalizer::normalize;

/// How a turn's text reaches the evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Spoken or free text: normalize first
    #[default]
    Spoken,
    /// Keypad entry: evaluate the text as typed
    Raw,
}

/// What happened to one turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub input: String,
    /// The symbolic expression that was actually evaluated
    pub expression: String,
    pub result: Result<f64, EvalError>,
}

/// Normalize (unless `mode` is [`Mode::Raw`]) and evaluate a single turn
pub fn evaluate_turn(input: &str, mode: Mode) -> TurnOutcome {
    let expression = match mode {
        Mode::Spoken => normalize(input),
        Mode::Raw => input.trim().to_string(),
    };
    let result = crate::evaluate(&expression);
    TurnOutcome {
        input: input.to_string(),
        expression,
        result,
    }
}

/// Evaluate every turn in parallel, keeping the input order
pub fn evaluate_turns<S: AsRef<str> + Sync>(inputs: &[S], mode: Mode) -> Vec<TurnOutcome> {
    debug!("Evaluating {} turns in {:?} mode", inputs.len(), mode);

    inputs
        .par_iter()
        .map(|input| evaluate_turn(input.as_ref(), mode))
        .collect()
}
