use thiserror::Error;

/// Errors raised around the scoring core: configuration, IO and task plumbing.
///
/// Scoring itself is total and never produces one of these.
#[derive(Debug, Error)]
pub enum ReadabilityError {
    /// Filesystem I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed TOML configuration.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
    /// A blocking scoring task panicked or was cancelled.
    #[error("scoring task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    /// Configuration values that parse but make no sense.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Result alias used across the readability crate.
pub type Result<T> = std::result::Result<T, ReadabilityError>;
