#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! TubeLytics readability engine: Flesch-Kincaid grade level and Flesch
//! reading ease for video and channel descriptions, single texts or batches.
//!
//! Scoring is a pure function of the input text. The engine wrapper adds
//! configuration, structured logging and a bounded search history.

/// Batch scoring and averaging.
pub mod batch;
/// TOML-backed runtime settings.
pub mod config;
/// Shared scoring runtime.
pub mod engine;
/// Error types.
pub mod error;
/// Bounded recent-search history.
pub mod history;
/// Flesch formulas and rounding.
pub mod score;
/// Vowel-group syllable estimation.
pub mod syllables;
/// Word and sentence splitting.
pub mod tokenizer;

/// Telemetry helpers.
#[path = "../telemetry.rs"]
pub mod telemetry;

pub use batch::{aggregate, aggregate_with, BatchResult, ScoredText};
pub use config::{ReadabilityConfig, DEFAULT_HISTORY_CAPACITY};
pub use engine::ReadabilityEngine;
pub use error::{ReadabilityError, Result};
pub use history::{HistoryEntry, SearchHistory};
pub use score::{
    flesch_kincaid_grade, flesch_reading_ease, round2, score, score_with, ReadabilityScore,
    TextStats,
};
pub use syllables::{count_syllables, count_syllables_in_text};
pub use telemetry::{ReadabilityTelemetry, ReadabilityTelemetryBuilder};
pub use tokenizer::{tokenize, tokenize_with, SentenceMode, Tokens};
