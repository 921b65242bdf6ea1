use std::{fmt, path::PathBuf, sync::Arc};

use anyhow::Result;
use serde_json::Value;
use shared_logging::{JsonLogger, LogLevel, LogRecord};

use crate::config::ReadabilityConfig;

/// Builder configuring readability telemetry sinks.
pub struct ReadabilityTelemetryBuilder {
    module: String,
    log_path: Option<PathBuf>,
    stderr: bool,
    min_level: LogLevel,
}

impl ReadabilityTelemetryBuilder {
    /// Creates a new builder for the given module label.
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            log_path: None,
            stderr: false,
            min_level: LogLevel::Info,
        }
    }

    /// Sets the JSON log path.
    #[must_use]
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Writes records to stderr when no log path is set.
    #[must_use]
    pub fn stderr(mut self, enabled: bool) -> Self {
        self.stderr = enabled;
        self
    }

    /// Drops records below `level`.
    #[must_use]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Finalizes the builder.
    pub fn build(self) -> Result<ReadabilityTelemetry> {
        let logger = match (self.log_path, self.stderr) {
            (Some(path), _) => Some(JsonLogger::new(path)?.with_min_level(self.min_level)),
            (None, true) => Some(JsonLogger::stderr().with_min_level(self.min_level)),
            (None, false) => None,
        };
        Ok(ReadabilityTelemetry {
            inner: Arc::new(TelemetryInner {
                module: self.module,
                logger,
            }),
        })
    }
}

/// Telemetry handle shared by the engine and its front ends.
#[derive(Clone)]
pub struct ReadabilityTelemetry {
    inner: Arc<TelemetryInner>,
}

impl fmt::Debug for ReadabilityTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadabilityTelemetry")
            .field("module", &self.inner.module)
            .field("logger", &self.inner.logger)
            .finish()
    }
}

struct TelemetryInner {
    module: String,
    logger: Option<JsonLogger>,
}

impl ReadabilityTelemetry {
    /// Returns a builder for this telemetry helper.
    #[must_use]
    pub fn builder(module: impl Into<String>) -> ReadabilityTelemetryBuilder {
        ReadabilityTelemetryBuilder::new(module)
    }

    /// Builds telemetry from the log settings of `config`.
    pub fn from_config(module: impl Into<String>, config: &ReadabilityConfig) -> Result<Self> {
        let mut builder = Self::builder(module).min_level(config.log_level);
        if let Some(path) = &config.log_path {
            builder = builder.log_path(path);
        }
        builder.build()
    }

    /// Whether a record at `level` reaches a sink.
    #[must_use]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.inner
            .logger
            .as_ref()
            .is_some_and(|logger| logger.enabled(level))
    }

    /// Logs a structured record.
    pub fn log(&self, level: LogLevel, message: &str, metadata: Value) -> Result<()> {
        if let Some(logger) = &self.inner.logger {
            let record = LogRecord::new(&self.inner.module, level, message).with_metadata(metadata);
            logger.log(&record)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn telemetry_writes_filtered_records() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("readability.log");
        let telemetry = ReadabilityTelemetry::builder("readability")
            .log_path(&log_path)
            .min_level(LogLevel::Info)
            .build()
            .unwrap();
        telemetry
            .log(LogLevel::Debug, "readability.score", json!({ "words": 2 }))
            .unwrap();
        telemetry
            .log(
                LogLevel::Info,
                "readability.batch.complete",
                json!({ "items": 3 }),
            )
            .unwrap();
        let content = std::fs::read_to_string(log_path).unwrap();
        assert!(content.contains("readability.batch.complete"));
        assert!(!content.contains("readability.score"));
        assert!(telemetry.enabled(LogLevel::Warn));
        assert!(!telemetry.enabled(LogLevel::Debug));
    }

    #[test]
    fn telemetry_without_sink_is_silent() {
        let telemetry = ReadabilityTelemetry::builder("readability").build().unwrap();
        assert!(!telemetry.enabled(LogLevel::Error));
        telemetry
            .log(LogLevel::Error, "readability.noop", json!({}))
            .unwrap();
    }

    #[test]
    fn from_config_uses_log_settings() {
        let dir = tempdir().unwrap();
        let config = ReadabilityConfig {
            log_path: Some(dir.path().join("cfg.log")),
            log_level: LogLevel::Debug,
            ..ReadabilityConfig::default()
        };
        let telemetry = ReadabilityTelemetry::from_config("readability", &config).unwrap();
        assert!(telemetry.enabled(LogLevel::Debug));
    }
}
