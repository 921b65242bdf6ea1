//! Shared scoring runtime used by the search path and the channel-profile path.

use std::sync::Arc;

use serde_json::json;
use shared_logging::LogLevel;
use tokio::task::JoinHandle;

use crate::{
    batch::{BatchResult, ScoredText},
    config::ReadabilityConfig,
    error::Result,
    history::{HistoryEntry, SearchHistory},
    score::{ReadabilityScore, TextStats},
    telemetry::ReadabilityTelemetry,
    tokenizer::SentenceMode,
};

/// Scores texts and keeps the bounded search history.
///
/// Clones share the same history.
#[derive(Debug, Clone)]
pub struct ReadabilityEngine {
    config: ReadabilityConfig,
    history: Arc<SearchHistory>,
    telemetry: Option<ReadabilityTelemetry>,
}

impl ReadabilityEngine {
    /// Creates an engine from configuration, without telemetry.
    #[must_use]
    pub fn new(config: ReadabilityConfig) -> Self {
        let history = Arc::new(SearchHistory::new(config.history_capacity));
        Self {
            config,
            history,
            telemetry: None,
        }
    }

    /// Attaches telemetry sinks.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: ReadabilityTelemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Returns telemetry handle if configured.
    #[must_use]
    pub const fn telemetry(&self) -> Option<&ReadabilityTelemetry> {
        self.telemetry.as_ref()
    }

    /// Sentence convention applied to every text.
    #[must_use]
    pub const fn sentence_mode(&self) -> SentenceMode {
        self.config.sentence_mode
    }

    /// Recent searches, shared across clones.
    #[must_use]
    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    /// Word, sentence and syllable counts for `text`.
    #[must_use]
    pub fn stats(&self, text: &str) -> TextStats {
        TextStats::from_text(text, self.sentence_mode())
    }

    /// Scores a single text.
    #[must_use]
    pub fn score(&self, text: &str) -> ReadabilityScore {
        let stats = self.stats(text);
        let score = ReadabilityScore::from_stats(&stats);
        if let Some(tel) = self.telemetry.as_ref().filter(|t| t.enabled(LogLevel::Debug)) {
            let _ = tel.log(
                LogLevel::Debug,
                "readability.score",
                json!({
                    "words": stats.words,
                    "sentences": stats.sentences,
                    "syllables": stats.syllables,
                    "fkGrade": score.fk_grade,
                    "readingEase": score.reading_ease,
                }),
            );
        }
        score
    }

    /// Scores every text in order and averages the results.
    #[must_use]
    pub fn aggregate<I, S>(&self, texts: I) -> BatchResult
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let texts: Vec<String> = texts.into_iter().map(Into::into).collect();
        self.log_batch("readability.batch.start", json!({ "count": texts.len() }));
        let items = texts
            .into_iter()
            .map(|text| {
                let score = self.score(&text);
                ScoredText { text, score }
            })
            .collect();
        let result = BatchResult::from_items(items);
        self.log_batch_complete(&result);
        result
    }

    /// Scores each text on the blocking pool and reassembles input order.
    pub async fn aggregate_concurrent(&self, texts: Vec<String>) -> Result<BatchResult> {
        self.log_batch("readability.batch.start", json!({ "count": texts.len() }));
        let tasks: Vec<_> = texts
            .into_iter()
            .map(|text| {
                let engine = self.clone();
                tokio::task::spawn_blocking(move || {
                    let score = engine.score(&text);
                    ScoredText { text, score }
                })
            })
            .collect();
        let items = self.join_in_order(tasks).await?;
        let result = BatchResult::from_items(items);
        self.log_batch_complete(&result);
        Ok(result)
    }

    async fn join_in_order(&self, tasks: Vec<JoinHandle<ScoredText>>) -> Result<Vec<ScoredText>> {
        let mut items = Vec::with_capacity(tasks.len());
        for (index, task) in tasks.into_iter().enumerate() {
            match task.await {
                Ok(item) => items.push(item),
                Err(err) => {
                    self.log_at(
                        LogLevel::Error,
                        "readability.batch.failed",
                        json!({ "index": index, "error": err.to_string() }),
                    );
                    return Err(err.into());
                }
            }
        }
        Ok(items)
    }

    /// Scores search-result descriptions and records the search.
    pub fn search<I, S>(&self, query: &str, descriptions: I) -> HistoryEntry
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let result = self.aggregate(descriptions);
        let entry = self.history.record(query, result);
        if let Some(tel) = self.telemetry.as_ref().filter(|t| t.enabled(LogLevel::Debug)) {
            let _ = tel.log(
                LogLevel::Debug,
                "readability.history.record",
                json!({
                    "id": entry.id,
                    "query": entry.query,
                    "retained": self.history.len(),
                }),
            );
        }
        entry
    }

    /// Scores the descriptions of a channel's videos without touching history.
    #[must_use]
    pub fn channel_videos<I, S>(&self, descriptions: I) -> BatchResult
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aggregate(descriptions)
    }

    /// Up to `limit` recorded searches, newest first.
    #[must_use]
    pub fn recent_searches(&self, limit: usize) -> Vec<HistoryEntry> {
        self.history.recent(limit)
    }

    fn log_batch_complete(&self, result: &BatchResult) {
        self.log_batch(
            "readability.batch.complete",
            json!({
                "count": result.len(),
                "avgFkGrade": result.avg_fk_grade,
                "avgReadingEase": result.avg_reading_ease,
            }),
        );
    }

    fn log_batch(&self, message: &str, metadata: serde_json::Value) {
        self.log_at(LogLevel::Info, message, metadata);
    }

    fn log_at(&self, level: LogLevel, message: &str, metadata: serde_json::Value) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(level, message, metadata);
        }
    }
}

impl Default for ReadabilityEngine {
    fn default() -> Self {
        Self::new(ReadabilityConfig::default())
    }
}
