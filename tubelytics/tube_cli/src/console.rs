//! JSON-lines command loop over stdin/stdout.

use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};
use shared_logging::LogLevel;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tubelytics_readability::{ReadabilityEngine, DEFAULT_HISTORY_CAPACITY};

/// Commands accepted from the console.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsoleCommand {
    /// Score one text.
    Score {
        /// Text to score.
        text: String,
    },
    /// Score search-result descriptions and record the search.
    Search {
        /// Search terms.
        query: String,
        /// Descriptions returned for the query.
        #[serde(default)]
        descriptions: Vec<String>,
    },
    /// List recent searches, newest first.
    History {
        /// Maximum entries returned.
        #[serde(default = "default_history_limit")]
        limit: usize,
    },
    /// Exit the loop.
    Quit,
}

const fn default_history_limit() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

enum Reply {
    Respond(Value),
    Skip,
    Quit,
}

/// Console session bound to one engine and its history.
pub struct ConsoleSession {
    engine: ReadabilityEngine,
}

impl ConsoleSession {
    /// Creates a session.
    #[must_use]
    pub const fn new(engine: ReadabilityEngine) -> Self {
        Self { engine }
    }

    /// Runs until `quit` or end of input; returns the number of responses written.
    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut responses = 0;
        while let Some(line) = lines.next_line().await? {
            match self.handle_line(&line) {
                Reply::Skip => continue,
                Reply::Quit => break,
                Reply::Respond(value) => {
                    let mut data = serde_json::to_vec(&value)?;
                    data.push(b'\n');
                    writer.write_all(&data).await?;
                    writer.flush().await?;
                    responses += 1;
                }
            }
        }
        self.log("tube.console.shutdown", json!({ "responses": responses }));
        Ok(responses)
    }

    fn handle_line(&self, line: &str) -> Reply {
        if line.trim().is_empty() {
            return Reply::Skip;
        }
        let command = match serde_json::from_str::<ConsoleCommand>(line) {
            Ok(command) => command,
            Err(err) => {
                self.log("tube.console.invalid_command", json!({ "error": err.to_string() }));
                return Reply::Respond(json!({ "error": format!("invalid console command JSON: {err}") }));
            }
        };
        match command {
            ConsoleCommand::Quit => Reply::Quit,
            command => Reply::Respond(self.dispatch(command)),
        }
    }

    fn dispatch(&self, command: ConsoleCommand) -> Value {
        let response = match command {
            ConsoleCommand::Score { text } => serde_json::to_value(self.engine.score(&text)),
            ConsoleCommand::Search {
                query,
                descriptions,
            } => serde_json::to_value(self.engine.search(&query, descriptions)),
            ConsoleCommand::History { limit } => {
                serde_json::to_value(self.engine.recent_searches(limit))
                    .map(|entries| json!({ "entries": entries }))
            }
            ConsoleCommand::Quit => Ok(Value::Null),
        };
        response.unwrap_or_else(|err| json!({ "error": err.to_string() }))
    }

    fn log(&self, message: &str, metadata: Value) {
        if let Some(tel) = self.engine.telemetry() {
            let _ = tel.log(LogLevel::Info, message, metadata);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::runtime::Runtime;

    fn run_script(session: &ConsoleSession, script: &str) -> (usize, Vec<Value>) {
        let rt = Runtime::new().unwrap();
        let mut out = Vec::new();
        let count = rt
            .block_on(session.run(script.as_bytes(), &mut out))
            .unwrap();
        let replies = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        (count, replies)
    }

    #[test]
    fn scores_and_records_searches() {
        let session = ConsoleSession::new(ReadabilityEngine::default());
        let script = concat!(
            "{\"type\":\"score\",\"text\":\"Hello world.\"}\n",
            "\n",
            "{\"type\":\"search\",\"query\":\"rust\",\"descriptions\":[\"Hello world.\"]}\n",
            "{\"type\":\"history\",\"limit\":5}\n",
        );
        let (count, replies) = run_script(&session, script);
        assert_eq!(count, 3);
        assert_eq!(replies[0]["fkGrade"], 2.5);
        assert_eq!(replies[1]["query"], "rust");
        assert_eq!(replies[1]["result"]["avgReadingEase"], 78.92);
        assert_eq!(replies[2]["entries"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn invalid_lines_get_error_replies() {
        let session = ConsoleSession::new(ReadabilityEngine::default());
        let script = "not json\n{\"type\":\"score\",\"text\":\"\"}\n";
        let (count, replies) = run_script(&session, script);
        assert_eq!(count, 2);
        assert!(replies[0]["error"].as_str().unwrap().contains("invalid"));
        assert_eq!(replies[1]["fkGrade"], 0.0);
    }

    #[test]
    fn quit_stops_the_loop() {
        let session = ConsoleSession::new(ReadabilityEngine::default());
        let script = "{\"type\":\"quit\"}\n{\"type\":\"score\",\"text\":\"ignored\"}\n";
        let (count, replies) = run_script(&session, script);
        assert_eq!(count, 0);
        assert!(replies.is_empty());
    }
}
