//! Session log for the control panel.
//!
//! Keeps recent entries in memory for display and appends every entry to a
//! per-session file under the platform data directory.

use chrono::{DateTime, Local};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use crate::config;

/// Log level enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Success => "OK",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

/// A single log entry.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            message: message.into(),
        }
    }

    /// Format the log entry for display.
    pub fn format_display(&self) -> String {
        format!(
            "[{}] {:<5} {}",
            self.timestamp.format("%H:%M:%S"),
            self.level.as_str(),
            self.message
        )
    }

    /// Format the log entry for file storage.
    pub fn format_file(&self) -> String {
        format!(
            "[{}] [{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.level.as_str(),
            self.message
        )
    }
}

/// Logger that manages log entries in memory and on disk.
#[derive(Debug, Clone)]
pub struct Logger {
    entries: Vec<LogEntry>,
    max_entries: usize,
    log_file: Option<PathBuf>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Logger with a fresh session file in the platform logs directory.
    pub fn new() -> Self {
        Self::with_file(Self::create_log_file())
    }

    /// Logger writing to `log_file`, or memory only when `None`.
    pub fn with_file(log_file: Option<PathBuf>) -> Self {
        Self {
            entries: Vec::new(),
            max_entries: 500,
            log_file,
        }
    }

    fn create_log_file() -> Option<PathBuf> {
        let logs_dir = config::logs_dir()?;
        fs::create_dir_all(&logs_dir).ok()?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = logs_dir.join(format!("session_{}.log", timestamp));
        File::create(&path).ok()?;

        Some(path)
    }

    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        let entry = LogEntry::new(level, message);

        if let Some(ref path) = self.log_file {
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                let _ = writeln!(file, "{}", entry.format_file());
            }
        }

        self.entries.push(entry);
        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn log_file_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Newest entries last, one per line.
    pub fn format_all(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.format_display())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_writes_file_and_trims() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.log");
        let mut logger = Logger::with_file(Some(path.clone()));
        logger.max_entries = 2;

        logger.info("one");
        logger.warning("two");
        logger.error("three");

        assert_eq!(logger.entries().len(), 2);
        assert_eq!(logger.entries()[0].message, "two");
        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert!(content.contains("[ERROR] three"));
    }

    #[test]
    fn test_memory_only_logger() {
        let mut logger = Logger::with_file(None);
        logger.success("bound");
        assert!(logger.format_all().contains("OK"));
        assert!(logger.log_file_path().is_none());
    }
}
