use serde::{Deserialize, Serialize};

use crate::{
    syllables::count_syllables_in_text,
    tokenizer::{tokenize_with, SentenceMode},
};

/// Raw counts feeding the Flesch formulas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStats {
    /// Whitespace-delimited words.
    pub words: usize,
    /// Sentence segments.
    pub sentences: usize,
    /// Estimated syllables across all words.
    pub syllables: usize,
}

impl TextStats {
    /// Collects counts for `text`.
    #[must_use]
    pub fn from_text(text: &str, mode: SentenceMode) -> Self {
        let tokens = tokenize_with(text, mode);
        Self {
            words: tokens.words.len(),
            sentences: tokens.sentence_count,
            syllables: count_syllables_in_text(&tokens.words),
        }
    }

    /// True when either formula would divide by zero.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.words == 0 || self.sentences == 0
    }

    #[allow(clippy::cast_precision_loss)]
    fn words_per_sentence(&self) -> f64 {
        self.words as f64 / self.sentences as f64
    }

    #[allow(clippy::cast_precision_loss)]
    fn syllables_per_word(&self) -> f64 {
        self.syllables as f64 / self.words as f64
    }
}

/// Flesch-Kincaid grade level and Flesch reading ease, both to two decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadabilityScore {
    /// US school grade needed to follow the text. May be negative.
    pub fk_grade: f64,
    /// 0-100 style ease score, higher reads easier. Not clamped.
    pub reading_ease: f64,
}

impl ReadabilityScore {
    /// Score reported for text with no words or no sentences.
    pub const ZERO: Self = Self {
        fk_grade: 0.0,
        reading_ease: 0.0,
    };

    /// Applies both formulas to precomputed counts.
    #[must_use]
    pub fn from_stats(stats: &TextStats) -> Self {
        Self {
            fk_grade: flesch_kincaid_grade(stats),
            reading_ease: flesch_reading_ease(stats),
        }
    }
}

/// `0.39 * W/S + 11.8 * Y/W - 15.59`, rounded; zero for degenerate counts.
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn flesch_kincaid_grade(stats: &TextStats) -> f64 {
    if stats.is_degenerate() {
        return 0.0;
    }
    round2(0.39 * stats.words_per_sentence() + 11.8 * stats.syllables_per_word() - 15.59)
}

/// `206.835 - 1.015 * W/S - 84.6 * Y/W`, rounded; zero for degenerate counts.
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn flesch_reading_ease(stats: &TextStats) -> f64 {
    if stats.is_degenerate() {
        return 0.0;
    }
    round2(206.835 - 1.015 * stats.words_per_sentence() - 84.6 * stats.syllables_per_word())
}

/// Scores `text` with the default sentence convention.
#[must_use]
pub fn score(text: &str) -> ReadabilityScore {
    score_with(text, SentenceMode::Split)
}

/// Scores `text` under an explicit [`SentenceMode`].
#[must_use]
pub fn score_with(text: &str, mode: SentenceMode) -> ReadabilityScore {
    ReadabilityScore::from_stats(&TextStats::from_text(text, mode))
}

/// Rounds to two decimals, halves away from zero.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hello_world_matches_hand_computation() {
        let stats = TextStats::from_text("Hello world.", SentenceMode::Split);
        assert_eq!(
            stats,
            TextStats {
                words: 2,
                sentences: 2,
                syllables: 3
            }
        );
        let result = score("Hello world.");
        assert_eq!(result.fk_grade, 2.5);
        assert_eq!(result.reading_ease, 78.92);
    }

    #[test]
    fn blank_text_scores_zero() {
        assert_eq!(score(""), ReadabilityScore::ZERO);
        assert_eq!(score("   \n\t"), ReadabilityScore::ZERO);
        assert_eq!(score_with("...", SentenceMode::Terminated), ReadabilityScore::ZERO);
    }

    #[test]
    fn terminated_mode_changes_denominator() {
        let result = score_with("Hello world.", SentenceMode::Terminated);
        // W/S = 2 instead of 1
        assert_eq!(result.fk_grade, 2.89);
        assert!((77.9..=77.91).contains(&result.reading_ease), "{result:?}");
    }

    #[test]
    fn negative_scores_are_kept() {
        let dense = "Internationalization characterization institutionalization \
                     telecommunications responsibilities";
        let result = score(dense);
        assert!(result.reading_ease < 0.0, "{result:?}");
        assert!(result.fk_grade > 20.0, "{result:?}");
    }

    #[test]
    fn rounding_moves_halves_away_from_zero() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(1.0), 1.0);
        assert_eq!(round2(-7.31249), -7.31);
    }

    #[test]
    fn scoring_is_repeatable() {
        let text = "The quick brown fox jumps over the lazy dog. It was not amused!";
        let first = score(text);
        let second = score(text);
        assert_eq!(first.fk_grade.to_bits(), second.fk_grade.to_bits());
        assert_eq!(first.reading_ease.to_bits(), second.reading_ease.to_bits());
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let value = serde_json::to_value(score("Hello world.")).unwrap();
        assert_eq!(value["fkGrade"], 2.5);
        assert_eq!(value["readingEase"], 78.92);
    }
}
