use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use shared_logging::LogLevel;

use crate::{
    error::{ReadabilityError, Result},
    tokenizer::SentenceMode,
};

/// Default number of searches kept in the history.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Runtime settings for the readability engine and its front ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadabilityConfig {
    /// Sentence counting convention.
    pub sentence_mode: SentenceMode,
    /// Number of searches retained, newest first.
    pub history_capacity: usize,
    /// Minimum level written to the JSON log.
    pub log_level: LogLevel,
    /// JSON log destination; no file logging when absent.
    pub log_path: Option<PathBuf>,
}

impl Default for ReadabilityConfig {
    fn default() -> Self {
        Self {
            sentence_mode: SentenceMode::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            log_level: LogLevel::Info,
            log_path: None,
        }
    }
}

impl ReadabilityConfig {
    /// Loads configuration from a TOML file.
    ///
    /// A relative `log_path` is resolved against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&raw)?;
        let source_dir = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        if let Some(log_path) = config.log_path.as_mut() {
            if log_path.is_relative() {
                *log_path = source_dir.join(&*log_path);
            }
        }
        Ok(config)
    }

    /// Parses and validates TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges the type system cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.history_capacity == 0 {
            return Err(ReadabilityError::InvalidConfig(
                "history_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
