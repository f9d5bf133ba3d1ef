use thiserror::Error;

/// Errors returned by [`crate::evaluate`] and the pieces it is built from
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Syntax error: {message} near `{fragment}`")]
    Syntax { fragment: String, message: String },
    #[error("Disallowed construct: {construct}")]
    DisallowedConstruct { construct: String },
    #[error("Division by zero")]
    DivisionByZero,
}

impl EvalError {
    pub(crate) fn syntax(fragment: impl Into<String>, message: impl Into<String>) -> Self {
        EvalError::Syntax {
            fragment: fragment.into(),
            message: message.into(),
        }
    }

    pub(crate) fn disallowed(construct: impl Into<String>) -> Self {
        EvalError::DisallowedConstruct {
            construct: construct.into(),
        }
    }

    /// Stable name of the error kind, for mapping to user-facing messages
    pub fn kind(&self) -> &'static str {
        match self {
            EvalError::Syntax { .. } => "SyntaxError",
            EvalError::DisallowedConstruct { .. } => "DisallowedConstruct",
            EvalError::DivisionByZero => "DivisionByZero",
        }
    }
}
