//! Natural-language arithmetic to canonical symbolic expressions

mod errors;
mod number_words;
mod phrases;
mod pipeline;

pub use errors::NumberWordError;
pub use number_words::{NumberWordResolver, is_number_word};
pub use phrases::PhraseTable;
pub use pipeline::{normalize, normalize_with};
