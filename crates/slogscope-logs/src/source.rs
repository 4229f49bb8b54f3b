use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use slogscope_types::{LogEvent, Severity};

use crate::error::Result;

/// How long a followed file waits at EOF before polling again
const FOLLOW_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// One JSON input line
#[derive(Debug, Deserialize)]
struct WireEvent {
    #[serde(alias = "message", alias = "condition", alias = "msg")]
    text: String,

    #[serde(default, alias = "stackTrace", alias = "stack")]
    stack_trace: Option<String>,

    #[serde(default, alias = "type", alias = "level")]
    severity: Option<String>,
}

/// Decode one input line into a log event
///
/// JSON objects carry `text`, `stack_trace` and `severity`. Anything else is
/// taken verbatim as an Info message without a stack trace.
pub fn decode_line(line: &str) -> LogEvent {
    let trimmed = line.trim();
    if trimmed.starts_with('{') {
        if let Ok(wire) = serde_json::from_str::<WireEvent>(trimmed) {
            let severity = match wire.severity.as_deref() {
                None => Severity::Info,
                Some(name) => Severity::parse(name).unwrap_or_else(|| {
                    tracing::warn!(severity = name, "unknown severity, using info");
                    Severity::Info
                }),
            };
            return LogEvent::new(wire.text, wire.stack_trace.unwrap_or_default(), severity);
        }
        tracing::debug!("line looks like JSON but did not decode, taking it verbatim");
    }

    LogEvent::new(line.trim_end_matches(['\r', '\n']), String::new(), Severity::Info)
}

/// Reads log events from byte streams and forwards them over a channel
pub struct LogSource {
    /// Cancellation token for stopping readers
    cancel: CancellationToken,

    /// Active reader task handles
    tasks: Vec<tokio::task::JoinHandle<()>>,
}

impl LogSource {
    pub fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
            tasks: Vec::new(),
        }
    }

    /// Read events from standard input until it closes
    pub fn start_stdin(&mut self, event_tx: mpsc::UnboundedSender<LogEvent>) {
        self.start_reader(tokio::io::stdin(), event_tx, false);
    }

    /// Read events from a file, optionally waiting for appended lines at EOF
    pub async fn start_file(
        &mut self,
        path: &Path,
        event_tx: mpsc::UnboundedSender<LogEvent>,
        follow: bool,
    ) -> Result<()> {
        let file = tokio::fs::File::open(path).await?;
        tracing::debug!(path = %path.display(), follow, "opened input file");
        self.start_reader(file, event_tx, follow);
        Ok(())
    }

    /// Spawn a task decoding lines from `reader`
    pub fn start_reader<R>(
        &mut self,
        reader: R,
        event_tx: mpsc::UnboundedSender<LogEvent>,
        follow: bool,
    ) where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let cancel = self.cancel.clone();

        let task = tokio::spawn(async move {
            let mut lines = BufReader::new(reader).lines();

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,

                    result = lines.next_line() => {
                        match result {
                            Ok(Some(line)) => {
                                if line.trim().is_empty() {
                                    continue;
                                }
                                if event_tx.send(decode_line(&line)).is_err() {
                                    // Receiver gone, nobody to deliver to
                                    break;
                                }
                            }
                            Ok(None) if follow => {
                                tokio::select! {
                                    _ = cancel.cancelled() => break,
                                    _ = tokio::time::sleep(FOLLOW_POLL_INTERVAL) => {}
                                }
                            }
                            Ok(None) => {
                                tracing::debug!("input stream ended");
                                break;
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "failed reading input");
                                break;
                            }
                        }
                    }
                }
            }
        });

        self.tasks.push(task);
    }

    /// Stop all readers
    pub fn stop(&mut self) {
        self.cancel.cancel();
        for task in self.tasks.drain(..) {
            task.abort();
        }
        // Fresh token so the source can be restarted
        self.cancel = CancellationToken::new();
    }

    /// Check if any reader is still running
    pub fn is_running(&self) -> bool {
        self.tasks.iter().any(|t| !t.is_finished())
    }
}

impl Default for LogSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LogSource {
    fn drop(&mut self) {
        self.stop();
    }
}
