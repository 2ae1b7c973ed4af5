//! Analyzer log contract: leveled, timestamped lines in a fixed format
//!
//! The log file produced here is the sole handoff artifact to the external
//! log analyzer, which parses each line byte-for-byte. The line format is
//! the wire contract and must stay stable:
//!
//! ```text
//! [LEVEL] YYYY-MM-DD HH:MM:SS - message
//! ```
//!
//! Records are also mirrored to `tracing` so operators see the same stream
//! on the console.

use crate::errors::{SharedError, SharedResult};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

/// Timestamp layout used in every log line (second precision, local time)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Severity of a single log record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        };
        write!(f, "{token}")
    }
}

impl FromStr for LogLevel {
    type Err = SharedError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "INFO" => Ok(LogLevel::Info),
            "WARNING" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            "CRITICAL" => Ok(LogLevel::Critical),
            _ => Err(SharedError::UnknownLevel {
                token: token.to_string(),
            }),
        }
    }
}

/// One line of the analyzer log, in parsed form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub level: LogLevel,
    pub timestamp: String,
    pub message: String,
}

impl LogRecord {
    /// Parse a line of the form `[LEVEL] YYYY-MM-DD HH:MM:SS - message`
    pub fn parse(line: &str) -> SharedResult<Self> {
        let rest = line.strip_prefix('[').ok_or_else(|| malformed(line))?;
        let (level, rest) = rest.split_once("] ").ok_or_else(|| malformed(line))?;
        let (timestamp, message) = rest.split_once(" - ").ok_or_else(|| malformed(line))?;

        Ok(Self {
            level: level.parse()?,
            timestamp: timestamp.to_string(),
            message: message.to_string(),
        })
    }

    /// Render the record back into its wire format
    pub fn format_line(&self) -> String {
        format!("[{}] {} - {}", self.level, self.timestamp, self.message)
    }
}

fn malformed(line: &str) -> SharedError {
    SharedError::MalformedRecord {
        line: line.to_string(),
    }
}

enum SinkTarget {
    File(File),
    Memory(Vec<String>),
}

/// Append-only sink for analyzer log lines
///
/// One line per `emit`, flushed immediately so a killed process still
/// leaves a consistent, truncation-safe file. Handlers may emit
/// concurrently; a mutex keeps the stream ordered by invocation. Write
/// failures are reported through `tracing` and otherwise swallowed — the
/// sink must never take the caller down with it.
pub struct LogSink {
    target: Mutex<SinkTarget>,
}

impl LogSink {
    /// Open (or create) the log file in append mode, creating parent
    /// directories as needed
    pub fn to_file(path: impl AsRef<Path>) -> SharedResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            target: Mutex::new(SinkTarget::File(file)),
        })
    }

    /// Capture lines in memory instead of a file; used by tests
    pub fn in_memory() -> Self {
        Self {
            target: Mutex::new(SinkTarget::Memory(Vec::new())),
        }
    }

    /// Append one record to the stream and flush it
    pub fn emit(&self, level: LogLevel, message: impl AsRef<str>) {
        let message = message.as_ref();
        let record = LogRecord {
            level,
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            message: message.to_string(),
        };
        let line = record.format_line();

        mirror_to_tracing(level, message);

        let mut target = match self.target.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match &mut *target {
            SinkTarget::File(file) => {
                if let Err(e) = writeln!(file, "{line}").and_then(|()| file.flush()) {
                    tracing::error!("Log sink write failed: {e}");
                }
            }
            SinkTarget::Memory(lines) => lines.push(line),
        }
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.emit(LogLevel::Info, message);
    }

    pub fn warning(&self, message: impl AsRef<str>) {
        self.emit(LogLevel::Warning, message);
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.emit(LogLevel::Error, message);
    }

    pub fn critical(&self, message: impl AsRef<str>) {
        self.emit(LogLevel::Critical, message);
    }

    /// Flush the underlying stream; a no-op for in-memory sinks
    pub fn flush(&self) {
        let mut target = match self.target.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let SinkTarget::File(file) = &mut *target {
            if let Err(e) = file.flush() {
                tracing::error!("Log sink flush failed: {e}");
            }
        }
    }

    /// Lines captured by an in-memory sink, in emit order; empty for
    /// file-backed sinks
    pub fn captured_lines(&self) -> Vec<String> {
        let target = match self.target.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match &*target {
            SinkTarget::File(_) => Vec::new(),
            SinkTarget::Memory(lines) => lines.clone(),
        }
    }

    /// Parsed records captured by an in-memory sink
    pub fn captured_records(&self) -> Vec<LogRecord> {
        self.captured_lines()
            .iter()
            .filter_map(|line| LogRecord::parse(line).ok())
            .collect()
    }
}

fn mirror_to_tracing(level: LogLevel, message: &str) {
    match level {
        LogLevel::Info => tracing::info!("{message}"),
        LogLevel::Warning => tracing::warn!("{message}"),
        LogLevel::Error => tracing::error!("{message}"),
        LogLevel::Critical => tracing::error!(critical = true, "{message}"),
    }
}

/// Initialize the tracing subscriber for console diagnostics
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = format!("server={log_level},shared={log_level},tower_http=warn,axum=warn");

    let _ = fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_round_trip() {
        for level in [
            LogLevel::Info,
            LogLevel::Warning,
            LogLevel::Error,
            LogLevel::Critical,
        ] {
            let parsed: LogLevel = level.to_string().parse().unwrap();
            assert_eq!(parsed, level);
        }
    }

    #[test]
    fn test_unknown_level_rejected() {
        let err = "DEBUG".parse::<LogLevel>().unwrap_err();
        assert!(matches!(err, SharedError::UnknownLevel { .. }));
    }

    #[test]
    fn test_record_parse() {
        let record =
            LogRecord::parse("[ERROR] 2024-03-01 12:00:00 - Database connection failed").unwrap();

        assert_eq!(record.level, LogLevel::Error);
        assert_eq!(record.timestamp, "2024-03-01 12:00:00");
        assert_eq!(record.message, "Database connection failed");
    }

    #[test]
    fn test_record_parse_keeps_message_separators() {
        // Only the first " - " splits timestamp from message
        let record = LogRecord::parse("[INFO] 2024-03-01 12:00:00 - a - b - c").unwrap();
        assert_eq!(record.message, "a - b - c");
    }

    #[test]
    fn test_record_parse_rejects_malformed_lines() {
        for line in ["", "no brackets here", "[INFO] missing separator"] {
            assert!(LogRecord::parse(line).is_err(), "accepted: {line:?}");
        }
    }

    #[test]
    fn test_record_format_line_round_trips() {
        let record = LogRecord {
            level: LogLevel::Warning,
            timestamp: "2024-03-01 12:00:00".to_string(),
            message: "Retrying database connection (attempt 1/3)".to_string(),
        };

        assert_eq!(
            record.format_line(),
            "[WARNING] 2024-03-01 12:00:00 - Retrying database connection (attempt 1/3)"
        );
        assert_eq!(LogRecord::parse(&record.format_line()).unwrap(), record);
    }

    #[test]
    fn test_in_memory_sink_preserves_order() {
        let sink = LogSink::in_memory();
        sink.info("first");
        sink.warning("second");
        sink.error("third");

        let records = sink.captured_records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].level, LogLevel::Info);
        assert_eq!(records[0].message, "first");
        assert_eq!(records[1].level, LogLevel::Warning);
        assert_eq!(records[2].level, LogLevel::Error);
        assert_eq!(records[2].message, "third");
    }

    #[test]
    fn test_file_sink_appends_and_flushes_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("application.log");

        let sink = LogSink::to_file(&path).unwrap();
        sink.info("Health check requested");
        sink.error("Email service connectivity problem");

        // No explicit flush call: emit must flush per line
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[INFO] "));
        assert!(lines[1].starts_with("[ERROR] "));
        assert!(lines[1].ends_with(" - Email service connectivity problem"));

        // A second sink on the same path appends rather than truncating
        let sink = LogSink::to_file(&path).unwrap();
        sink.warning("Retrying database connection (attempt 1/3)");
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_every_emitted_line_parses() {
        let sink = LogSink::in_memory();
        sink.critical("Unable to initialize critical service: payment-service");

        for line in sink.captured_lines() {
            let record = LogRecord::parse(&line).unwrap();
            assert_eq!(record.timestamp.len(), "2024-03-01 12:00:00".len());
        }
    }
}
