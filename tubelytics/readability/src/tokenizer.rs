use std::{fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ReadabilityError;

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Characters that end a sentence segment.
pub const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// How sentence segments are counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentenceMode {
    /// Every segment between terminators counts, empty ones included, so
    /// `"Hello."` is two sentences. Matches the published scores.
    #[default]
    Split,
    /// Only segments holding non-whitespace text count.
    Terminated,
}

impl SentenceMode {
    /// Returns the config/CLI label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Split => "split",
            Self::Terminated => "terminated",
        }
    }
}

impl fmt::Display for SentenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SentenceMode {
    type Err = ReadabilityError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "split" => Ok(Self::Split),
            "terminated" => Ok(Self::Terminated),
            other => Err(ReadabilityError::InvalidConfig(format!(
                "unknown sentence mode `{other}` (expected `split` or `terminated`)"
            ))),
        }
    }
}

/// Words and sentence count extracted from one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokens<'a> {
    /// Whitespace-delimited words in input order, never empty strings.
    pub words: Vec<&'a str>,
    /// Number of sentence segments under the chosen [`SentenceMode`].
    pub sentence_count: usize,
}

/// Tokenizes with the default [`SentenceMode::Split`] convention.
#[must_use]
pub fn tokenize(text: &str) -> Tokens<'_> {
    tokenize_with(text, SentenceMode::Split)
}

/// Tokenizes `text` into words and a sentence count.
#[must_use]
pub fn tokenize_with(text: &str, mode: SentenceMode) -> Tokens<'_> {
    Tokens {
        words: split_words(text),
        sentence_count: count_sentences(text, mode),
    }
}

/// Splits on runs of whitespace, dropping the empty tokens produced by
/// leading or trailing whitespace.
#[must_use]
pub fn split_words(text: &str) -> Vec<&str> {
    WHITESPACE
        .split(text)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Counts sentence segments separated by `.`, `!` or `?`.
///
/// In [`SentenceMode::Split`] text without any terminator is one segment, and
/// the empty string is one (empty) segment as well.
#[must_use]
pub fn count_sentences(text: &str, mode: SentenceMode) -> usize {
    let segments = text.split(SENTENCE_TERMINATORS);
    match mode {
        SentenceMode::Split => segments.count(),
        SentenceMode::Terminated => segments
            .filter(|segment| !segment.trim().is_empty())
            .count(),
    }
}
