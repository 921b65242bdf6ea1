use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use shared_logging::LogLevel;
use tokio::{io::BufReader, runtime::Runtime};
use tubelytics_readability::{
    ReadabilityConfig, ReadabilityEngine, ReadabilityTelemetry, SentenceMode,
};

mod console;

use console::ConsoleSession;

#[derive(Parser, Debug)]
#[command(
    name = "tube",
    version,
    about = "Flesch-Kincaid readability scoring for video descriptions"
)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Sentence counting convention (`split` or `terminated`).
    #[arg(long, global = true)]
    sentence_mode: Option<SentenceMode>,
    /// JSON log destination.
    #[arg(long, global = true)]
    log_path: Option<PathBuf>,
    /// Minimum log level.
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,
    /// Log to stderr when no log path is configured.
    #[arg(long, global = true)]
    log_stderr: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scores one text from the argument, a file, or stdin.
    Score {
        text: Option<String>,
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },
    /// Scores a JSON array of strings or one text per line.
    Batch {
        #[arg(long)]
        file: Option<PathBuf>,
        /// Score items on the blocking thread pool.
        #[arg(long)]
        concurrent: bool,
    },
    /// Reads JSON-line commands from stdin until `quit`.
    Console,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let telemetry = build_telemetry(&config, cli.log_stderr)?;
    let engine = ReadabilityEngine::new(config).with_telemetry(telemetry);
    match cli.command {
        Commands::Score { text, file } => {
            let text = match text {
                Some(text) => text,
                None => read_input(file.as_deref())?,
            };
            let score = engine.score(&text);
            println!("{}", serde_json::to_string_pretty(&score)?);
            Ok(())
        }
        Commands::Batch { file, concurrent } => {
            let texts = parse_batch(&read_input(file.as_deref())?);
            let result = if concurrent {
                let rt = Runtime::new()?;
                rt.block_on(engine.aggregate_concurrent(texts))?
            } else {
                engine.aggregate(texts)
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Commands::Console => {
            let rt = Runtime::new()?;
            let session = ConsoleSession::new(engine);
            rt.block_on(async {
                let stdin = BufReader::new(tokio::io::stdin());
                session.run(stdin, tokio::io::stdout()).await
            })?;
            Ok(())
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<ReadabilityConfig> {
    let mut config = match &cli.config {
        Some(path) => ReadabilityConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ReadabilityConfig::default(),
    };
    if let Some(mode) = cli.sentence_mode {
        config.sentence_mode = mode;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(path) = &cli.log_path {
        config.log_path = Some(path.clone());
    }
    config.validate()?;
    Ok(config)
}

fn build_telemetry(config: &ReadabilityConfig, stderr: bool) -> Result<ReadabilityTelemetry> {
    let mut builder = ReadabilityTelemetry::builder("tube")
        .min_level(config.log_level)
        .stderr(stderr);
    if let Some(path) = &config.log_path {
        builder = builder.log_path(path);
    }
    let telemetry = builder.build()?;
    let _ = telemetry.log(
        LogLevel::Debug,
        "tube.start",
        json!({ "sentenceMode": config.sentence_mode.label() }),
    );
    Ok(telemetry)
}

fn read_input(file: Option<&Path>) -> Result<String> {
    if let Some(path) = file {
        return fs::read_to_string(path).with_context(|| format!("reading {}", path.display()));
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("reading stdin")?;
    Ok(buffer)
}

/// A JSON array of strings, otherwise one text per non-blank line.
fn parse_batch(raw: &str) -> Vec<String> {
    if let Ok(texts) = serde_json::from_str::<Vec<String>>(raw) {
        return texts;
    }
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn batch_accepts_json_and_lines() {
        let json = parse_batch(r#"["Hello world.", ""]"#);
        assert_eq!(json, vec!["Hello world.", ""]);
        let lines = parse_batch("first text\n\n  \nsecond text\n");
        assert_eq!(lines, vec!["first text", "second text"]);
    }

    #[test]
    fn bracketed_first_line_stays_in_line_mode() {
        let texts = parse_batch(
            "[4K] Full walkthrough of the new update.\nSecond video description here.\n",
        );
        assert_eq!(
            texts,
            vec![
                "[4K] Full walkthrough of the new update.",
                "Second video description here."
            ]
        );
        assert_eq!(parse_batch("[1, 2]"), vec!["[1, 2]"]);
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tube.toml");
        fs::write(&path, "sentence_mode = \"terminated\"\nhistory_capacity = 4\n").unwrap();
        let cli = Cli::parse_from([
            "tube",
            "--config",
            path.to_str().unwrap(),
            "--sentence-mode",
            "split",
            "--log-level",
            "warn",
            "score",
            "Hello world.",
        ]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.sentence_mode, SentenceMode::Split);
        assert_eq!(config.history_capacity, 4);
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn rejects_unknown_sentence_mode() {
        let parsed = Cli::try_parse_from(["tube", "--sentence-mode", "clauses", "console"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn read_input_prefers_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("description.txt");
        fs::write(&path, "A short description.").unwrap();
        assert_eq!(read_input(Some(path.as_path())).unwrap(), "A short description.");
    }
}
