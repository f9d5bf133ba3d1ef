use std::collections::HashMap;

use log::trace;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Spoken operator phrases and the symbol each one stands for
const BUILTIN_PHRASES: &[(&str, &str)] = &[
    ("to the power of", "**"),
    ("power of", "**"),
    ("power", "**"),
    ("divided by", "/"),
    ("divide by", "/"),
    ("divide", "/"),
    ("over", "/"),
    ("multiplied by", "*"),
    ("multiply by", "*"),
    ("times", "*"),
    ("into", "*"),
    ("x", "*"),
    ("minus", "-"),
    ("subtract", "-"),
    ("plus", "+"),
    ("add", "+"),
    ("modulo", "%"),
    ("mod", "%"),
    ("open parenthesis", "("),
    ("close parenthesis", ")"),
    ("open bracket", "("),
    ("close bracket", ")"),
    ("point", "."),
];

#[allow(clippy::expect_used)]
static BUILTIN: Lazy<PhraseTable> = Lazy::new(|| {
    PhraseTable::new(BUILTIN_PHRASES.iter().copied())
        .expect("built-in phrases form a valid pattern")
});

/// Phrase-to-symbol rewrite table.
///
/// Phrases are kept longest first, and all of them are matched by a single
/// alternation in that order, so a phrase never loses to a shorter one that
/// shares its prefix or suffix ("to the power of" before "power").
#[derive(Debug, Clone)]
pub struct PhraseTable {
    phrases: Vec<(String, String)>,
    lookup: HashMap<String, String>,
    pattern: Regex,
}

impl PhraseTable {
    /// Build a table from `(phrase, symbol)` pairs.
    ///
    /// Phrases are matched case-sensitively on word boundaries; any run of
    /// whitespace in the input matches a single space in a phrase.
    ///
    /// # Errors
    ///
    /// Returns an error if the combined pattern cannot be compiled.
    pub fn new<'p>(
        entries: impl IntoIterator<Item = (&'p str, &'p str)>,
    ) -> Result<Self, regex::Error> {
        let mut phrases: Vec<(String, String)> = entries
            .into_iter()
            .map(|(phrase, symbol)| (canonical_phrase(phrase), symbol.to_string()))
            .filter(|(phrase, _)| !phrase.is_empty())
            .collect();

        phrases.sort_by(|a, b| {
            b.0.chars()
                .count()
                .cmp(&a.0.chars().count())
                .then_with(|| a.0.cmp(&b.0))
        });
        phrases.dedup_by(|a, b| a.0 == b.0);

        let alternation = phrases
            .iter()
            .map(|(phrase, _)| {
                phrase
                    .split(' ')
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\s+")
            })
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"\b(?:{})\b", alternation))?;

        let lookup = phrases.iter().cloned().collect();

        Ok(Self {
            phrases,
            lookup,
            pattern,
        })
    }

    /// The table used by [`crate::normalize`]
    pub fn builtin() -> &'static PhraseTable {
        &BUILTIN
    }

    /// Phrases in match priority order
    pub fn phrases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.phrases.iter().map(|(p, s)| (p.as_str(), s.as_str()))
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Replace every phrase occurrence in `text` with its symbol
    pub fn apply(&self, text: &str) -> String {
        if self.phrases.is_empty() {
            return text.to_string();
        }
        self.pattern
            .replace_all(text, |caps: &Captures| {
                let matched = caps.get(0).map_or("", |m| m.as_str());
                let key = canonical_phrase(matched);
                match self.lookup.get(&key) {
                    Some(symbol) => {
                        trace!("Phrase '{}' -> '{}'", matched, symbol);
                        format!(" {} ", symbol)
                    }
                    None => matched.to_string(),
                }
            })
            .into_owned()
    }
}

fn canonical_phrase(phrase: &str) -> String {
    phrase.split_whitespace().collect::<Vec<_>>().join(" ")
}
