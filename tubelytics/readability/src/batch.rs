use serde::{Deserialize, Serialize};

use crate::{
    score::{round2, score_with, ReadabilityScore},
    tokenizer::SentenceMode,
};

/// One input text paired with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredText {
    /// Source text as supplied by the caller.
    pub text: String,
    /// Score for `text`.
    #[serde(flatten)]
    pub score: ReadabilityScore,
}

impl ScoredText {
    /// Scores `text` under `mode`.
    #[must_use]
    pub fn new(text: impl Into<String>, mode: SentenceMode) -> Self {
        let text = text.into();
        let score = score_with(&text, mode);
        Self { text, score }
    }
}

/// Scores for a collection of texts plus their rounded averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    /// Items in caller order.
    pub items: Vec<ScoredText>,
    /// Mean grade level, rounded to two decimals.
    pub avg_fk_grade: f64,
    /// Mean reading ease, rounded to two decimals.
    pub avg_reading_ease: f64,
}

impl BatchResult {
    /// Builds the result from already-scored items, computing the averages.
    #[must_use]
    pub fn from_items(items: Vec<ScoredText>) -> Self {
        let avg_fk_grade = round2(mean(items.iter().map(|item| item.score.fk_grade)));
        let avg_reading_ease = round2(mean(items.iter().map(|item| item.score.reading_ease)));
        Self {
            items,
            avg_fk_grade,
            avg_reading_ease,
        }
    }

    /// Number of scored items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the batch held no texts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for BatchResult {
    fn default() -> Self {
        Self::from_items(Vec::new())
    }
}

/// Scores every text with the default sentence convention.
#[must_use]
pub fn aggregate<I, S>(texts: I) -> BatchResult
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    aggregate_with(texts, SentenceMode::Split)
}

/// Scores every text under `mode`, keeping input order.
#[must_use]
pub fn aggregate_with<I, S>(texts: I, mode: SentenceMode) -> BatchResult
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let items = texts
        .into_iter()
        .map(|text| ScoredText::new(text, mode))
        .collect();
    BatchResult::from_items(items)
}

/// Arithmetic mean, zero for an empty sequence.
#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
