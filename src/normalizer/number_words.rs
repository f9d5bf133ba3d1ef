//! Spoken English cardinals to digits
//!
//! Short-scale composition: units, teens and tens add up into a group,
//! "hundred" multiplies the group, "thousand" and "million" close it.

use log::{debug, trace};

use crate::normalizer::errors::NumberWordError;

const ONES: &[(&str, u64)] = &[
    ("zero", 0),
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
];

const TEENS: &[(&str, u64)] = &[
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
];

const TENS: &[(&str, u64)] = &[
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
];

const SCALES: &[(&str, u64)] = &[("thousand", 1_000), ("million", 1_000_000)];

const HUNDRED: &str = "hundred";
const AND: &str = "and";
const ARTICLE: &str = "a";
const ARTICLE_AN: &str = "an";
const POINT: &str = "point";
const DECIMAL_SEPARATOR: &str = ".";

fn lookup(table: &[(&str, u64)], word: &str) -> Option<u64> {
    table.iter().find(|(name, _)| *name == word).map(|(_, v)| *v)
}

/// Whether `word` makes a run of tokens worth handing to the resolver
pub fn is_number_word(word: &str) -> bool {
    lookup(ONES, word).is_some()
        || lookup(TEENS, word).is_some()
        || lookup(TENS, word).is_some()
        || lookup(SCALES, word).is_some()
        || matches!(word, HUNDRED | AND | ARTICLE | ARTICLE_AN | POINT)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Word {
    Zero,
    Unit(u64),
    Teen(u64),
    Tens(u64),
    Hundred,
    Scale(u64),
    Digits(u64),
    And,
}

fn classify(token: &str) -> Result<Word, NumberWordError> {
    if token == AND {
        return Ok(Word::And);
    }
    if token == HUNDRED {
        return Ok(Word::Hundred);
    }
    if let Some(v) = lookup(ONES, token) {
        return Ok(if v == 0 { Word::Zero } else { Word::Unit(v) });
    }
    if let Some(v) = lookup(TEENS, token) {
        return Ok(Word::Teen(v));
    }
    if let Some(v) = lookup(TENS, token) {
        return Ok(Word::Tens(v));
    }
    if let Some(v) = lookup(SCALES, token) {
        return Ok(Word::Scale(v));
    }
    if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
        return token
            .parse::<u64>()
            .map(Word::Digits)
            .map_err(|_| NumberWordError::UnrecognizedWord(token.to_string()));
    }
    Err(NumberWordError::UnrecognizedWord(token.to_string()))
}

/// Resolves runs of number words such as `["twenty", "three"]` into `"23"`.
///
/// Stateless; one value serves any number of callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberWordResolver;

impl NumberWordResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a run of lowercase tokens into a canonical numeric string.
    ///
    /// A `.` or `point` token splits the run into an integer part, composed
    /// as a cardinal, and a fractional part read digit by digit. A free
    /// standing `a` or `an` counts as `one`.
    ///
    /// # Errors
    ///
    /// Returns an error when the run contains no cardinal at all, contains a
    /// word that is not a number word, or the words do not compose into a
    /// single number (e.g. "nine five").
    pub fn resolve<S: AsRef<str>>(&self, tokens: &[S]) -> Result<String, NumberWordError> {
        let words: Vec<&str> = tokens
            .iter()
            .map(|t| match t.as_ref() {
                ARTICLE | ARTICLE_AN => "one",
                other => other,
            })
            .collect();
        let phrase = words.join(" ");
        trace!("Resolving number words: '{}'", phrase);

        let split = words
            .iter()
            .position(|w| *w == POINT || *w == DECIMAL_SEPARATOR);

        let (integer_words, fraction_words) = match split {
            Some(i) => (
                words.get(..i).unwrap_or_default(),
                Some(words.get(i + 1..).unwrap_or_default()),
            ),
            None => (words.as_slice(), None),
        };

        let resolved = match fraction_words {
            None => compose_cardinal(integer_words, &phrase)?.to_string(),
            Some(fraction) => {
                let fraction = read_fraction(fraction)?;
                let integer = if integer_words.is_empty() {
                    0
                } else {
                    compose_cardinal(integer_words, &phrase)?
                };
                format!("{}.{}", integer, fraction)
            }
        };

        debug!("Resolved '{}' to {}", phrase, resolved);
        Ok(resolved)
    }

    /// Like [`resolve`](Self::resolve), but hands back the tokens joined
    /// with spaces when they do not form a number.
    pub fn resolve_or_passthrough<S: AsRef<str>>(&self, tokens: &[S]) -> String {
        match self.resolve(tokens) {
            Ok(resolved) => resolved,
            Err(e) => {
                let original: Vec<&str> = tokens.iter().map(|t| t.as_ref()).collect();
                let original = original.join(" ");
                debug!("Leaving '{}' as is: {}", original, e);
                original
            }
        }
    }
}

fn compose_cardinal(words: &[&str], phrase: &str) -> Result<u64, NumberWordError> {
    let incoherent = |word: &str| NumberWordError::Incoherent {
        word: word.to_string(),
        phrase: phrase.to_string(),
    };

    let mut total: u64 = 0;
    let mut current: u64 = 0;
    let mut prev: Option<Word> = None;
    let mut last_scale: Option<u64> = None;

    for (i, &token) in words.iter().enumerate() {
        let word = classify(token)?;
        let fits = match word {
            Word::And => continue,
            Word::Zero => prev.is_none(),
            Word::Unit(_) => matches!(
                prev,
                None | Some(Word::Tens(_) | Word::Hundred | Word::Scale(_))
            ),
            Word::Teen(_) | Word::Tens(_) => {
                matches!(prev, None | Some(Word::Hundred | Word::Scale(_)))
            }
            Word::Digits(v) => match prev {
                None => true,
                Some(Word::Tens(_)) => (1..=9).contains(&v),
                Some(Word::Hundred) => (1..100).contains(&v),
                // a group after a scale only exceeds 99 when a smaller scale closes it
                Some(Word::Scale(scale)) => {
                    v >= 1 && v < scale && (v < 100 || next_is_scale(words, i))
                }
                _ => false,
            },
            Word::Hundred => {
                matches!(
                    prev,
                    Some(Word::Unit(_) | Word::Teen(_) | Word::Tens(_) | Word::Digits(_))
                ) && (1..100).contains(&current)
            }
            Word::Scale(scale) => {
                matches!(
                    prev,
                    Some(
                        Word::Unit(_)
                            | Word::Teen(_)
                            | Word::Tens(_)
                            | Word::Hundred
                            | Word::Digits(_)
                    )
                ) && (1..1_000).contains(&current)
                    && last_scale.is_none_or(|last| scale < last)
            }
        };
        if !fits {
            return Err(incoherent(token));
        }

        match word {
            Word::Zero | Word::And => {}
            Word::Unit(v) | Word::Teen(v) | Word::Tens(v) | Word::Digits(v) => {
                current = current.checked_add(v).ok_or_else(|| incoherent(token))?;
            }
            Word::Hundred => current *= 100,
            Word::Scale(scale) => {
                total = current
                    .checked_mul(scale)
                    .and_then(|group| total.checked_add(group))
                    .ok_or_else(|| incoherent(token))?;
                current = 0;
                last_scale = Some(scale);
            }
        }
        prev = Some(word);
    }

    if prev.is_none() {
        return Err(NumberWordError::NoNumberWords);
    }

    total.checked_add(current).ok_or_else(|| incoherent(phrase))
}

/// Whether the next word after position `i`, skipping "and", is a scale word
fn next_is_scale(words: &[&str], i: usize) -> bool {
    words
        .iter()
        .skip(i + 1)
        .find(|w| **w != AND)
        .is_some_and(|w| lookup(SCALES, w).is_some())
}

fn read_fraction(words: &[&str]) -> Result<String, NumberWordError> {
    if words.is_empty() {
        return Err(NumberWordError::InvalidFraction(String::new()));
    }

    let mut digits = String::new();
    for &word in words {
        if let Some(v) = lookup(ONES, word) {
            digits.push_str(&v.to_string());
        } else if word.chars().all(|c| c.is_ascii_digit()) {
            digits.push_str(word);
        } else {
            return Err(NumberWordError::InvalidFraction(word.to_string()));
        }
    }
    Ok(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(phrase: &str) -> Result<String, NumberWordError> {
        let tokens: Vec<&str> = phrase.split_whitespace().collect();
        NumberWordResolver::new().resolve(tokens.as_slice())
    }

    #[test]
    fn test_resolve_simple() {
        assert_eq!(resolve("zero"), Ok("0".to_string()));
        assert_eq!(resolve("seven"), Ok("7".to_string()));
        assert_eq!(resolve("thirteen"), Ok("13".to_string()));
        assert_eq!(resolve("twenty three"), Ok("23".to_string()));
        assert_eq!(resolve("ninety"), Ok("90".to_string()));
    }

    #[test]
    fn test_resolve_magnitudes() {
        assert_eq!(resolve("one hundred"), Ok("100".to_string()));
        assert_eq!(resolve("three hundred and forty two"), Ok("342".to_string()));
        assert_eq!(
            resolve("three hundred forty two thousand five hundred"),
            Ok("342500".to_string())
        );
        assert_eq!(
            resolve("two million three thousand and one"),
            Ok("2003001".to_string())
        );
        assert_eq!(resolve("nineteen hundred"), Ok("1900".to_string()));
    }

    #[test]
    fn test_resolve_article() {
        assert_eq!(resolve("a hundred"), Ok("100".to_string()));
        assert_eq!(resolve("a thousand and a"), Ok("1001".to_string()));
        assert_eq!(resolve("an hundred"), Ok("100".to_string()));
    }

    #[test]
    fn test_resolve_decimals() {
        assert_eq!(resolve("twenty three point five"), Ok("23.5".to_string()));
        assert_eq!(resolve("three . one four"), Ok("3.14".to_string()));
        assert_eq!(resolve("point five"), Ok("0.5".to_string()));
        assert_eq!(resolve("one point zero five"), Ok("1.05".to_string()));
    }

    #[test]
    fn test_resolve_mixed_digits() {
        assert_eq!(resolve("5 thousand"), Ok("5000".to_string()));
        assert_eq!(resolve("twenty 3"), Ok("23".to_string()));
        assert_eq!(resolve("2 point 5"), Ok("2.5".to_string()));
        assert_eq!(resolve("one hundred 25"), Ok("125".to_string()));
        assert_eq!(resolve("five thousand 2 hundred"), Ok("5200".to_string()));
        assert_eq!(resolve("one million 250 thousand"), Ok("1250000".to_string()));
    }

    #[test]
    fn test_resolve_oversized_digit_groups() {
        assert!(matches!(
            resolve("one hundred 250"),
            Err(NumberWordError::Incoherent { .. })
        ));
        assert!(matches!(
            resolve("five thousand 2000"),
            Err(NumberWordError::Incoherent { .. })
        ));
        assert!(matches!(
            resolve("five thousand 250"),
            Err(NumberWordError::Incoherent { .. })
        ));
        assert!(matches!(
            resolve("two million 5000 thousand"),
            Err(NumberWordError::Incoherent { .. })
        ));
    }

    #[test]
    fn test_resolve_incoherent() {
        assert!(matches!(
            resolve("nine five"),
            Err(NumberWordError::Incoherent { .. })
        ));
        assert!(matches!(
            resolve("thousand"),
            Err(NumberWordError::Incoherent { .. })
        ));
        assert!(matches!(
            resolve("one thousand two million"),
            Err(NumberWordError::Incoherent { .. })
        ));
        assert!(matches!(
            resolve("twenty zero"),
            Err(NumberWordError::Incoherent { .. })
        ));
        assert!(matches!(
            resolve("fifteen six"),
            Err(NumberWordError::Incoherent { .. })
        ));
    }

    #[test]
    fn test_resolve_failures() {
        assert_eq!(resolve("and"), Err(NumberWordError::NoNumberWords));
        assert_eq!(
            resolve("what is five"),
            Err(NumberWordError::UnrecognizedWord("what".to_string()))
        );
        assert_eq!(
            resolve("five point"),
            Err(NumberWordError::InvalidFraction(String::new()))
        );
        assert_eq!(
            resolve("five point twenty"),
            Err(NumberWordError::InvalidFraction("twenty".to_string()))
        );
    }

    #[test]
    fn test_passthrough_keeps_original_tokens() {
        let resolver = NumberWordResolver::new();
        assert_eq!(resolver.resolve_or_passthrough(&["nine", "five"]), "nine five");
        assert_eq!(resolver.resolve_or_passthrough(&["a", "banana"]), "a banana");
        assert_eq!(resolver.resolve_or_passthrough(&["a", "hundred"]), "100");
    }

    #[test]
    fn test_is_number_word() {
        assert!(is_number_word("eleven"));
        assert!(is_number_word("million"));
        assert!(is_number_word("a"));
        assert!(is_number_word("an"));
        assert!(is_number_word("point"));
        assert!(!is_number_word("banana"));
        assert!(!is_number_word("12"));
    }
}
