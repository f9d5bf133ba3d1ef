use thiserror::Error;

/// Reasons a run of words could not be read as a number
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumberWordError {
    #[error("No number words found")]
    NoNumberWords,
    #[error("Not a number word: {0}")]
    UnrecognizedWord(String),
    #[error("'{word}' does not fit in '{phrase}'")]
    Incoherent { word: String, phrase: String },
    #[error("Invalid digits after decimal point: {0}")]
    InvalidFraction(String),
}
