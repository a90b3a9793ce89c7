//! Kernel log models
//!
//! The kernel log view keeps a newest-first buffer of entries and offers
//! filtering by level, free-text search, per-level counts and a plain
//! text export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{status_enum_str, Tone};

/// Log severity levels, least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

status_enum_str!(LogLevel, "log level", {
    Debug => "debug",
    Info => "info",
    Warning => "warning",
    Error => "error",
    Critical => "critical",
});

impl LogLevel {
    pub fn tone(&self) -> Tone {
        match self {
            LogLevel::Debug => Tone::Muted,
            LogLevel::Info => Tone::Info,
            LogLevel::Warning => Tone::Caution,
            LogLevel::Error => Tone::Warning,
            LogLevel::Critical => Tone::Danger,
        }
    }
}

/// A single kernel log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub source: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl LogEntry {
    /// Export line: `[<iso timestamp>] [<LEVEL>] [<source>] <message>`
    pub fn export_line(&self) -> String {
        format!(
            "[{}] [{}] [{}] {}",
            self.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            self.level.as_str().to_uppercase(),
            self.source,
            self.message
        )
    }
}

/// Filter applied by the kernel log view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFilter {
    /// Only this level, or all levels when `None`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<LogLevel>,
    /// Case-insensitive substring matched against message and source
    #[serde(default)]
    pub search: String,
}

impl LogFilter {
    pub fn matches(&self, entry: &LogEntry) -> bool {
        let level_ok = self.level.map_or(true, |level| entry.level == level);
        if !level_ok {
            return false;
        }
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        entry.message.to_lowercase().contains(&needle)
            || entry.source.to_lowercase().contains(&needle)
    }

    pub fn apply<'a>(&self, entries: impl IntoIterator<Item = &'a LogEntry>) -> Vec<&'a LogEntry> {
        entries.into_iter().filter(|e| self.matches(e)).collect()
    }
}

/// Entry counts per level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogCounts {
    pub all: usize,
    pub debug: usize,
    pub info: usize,
    pub warning: usize,
    pub error: usize,
    pub critical: usize,
}

impl LogCounts {
    pub fn tally<'a>(entries: impl IntoIterator<Item = &'a LogEntry>) -> Self {
        let mut counts = LogCounts::default();
        for entry in entries {
            counts.all += 1;
            match entry.level {
                LogLevel::Debug => counts.debug += 1,
                LogLevel::Info => counts.info += 1,
                LogLevel::Warning => counts.warning += 1,
                LogLevel::Error => counts.error += 1,
                LogLevel::Critical => counts.critical += 1,
            }
        }
        counts
    }

    pub fn get(&self, level: LogLevel) -> usize {
        match level {
            LogLevel::Debug => self.debug,
            LogLevel::Info => self.info,
            LogLevel::Warning => self.warning,
            LogLevel::Error => self.error,
            LogLevel::Critical => self.critical,
        }
    }
}

/// Join entries into the export text format
pub fn export_logs<'a>(entries: impl IntoIterator<Item = &'a LogEntry>) -> String {
    entries
        .into_iter()
        .map(LogEntry::export_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// File name used for a log export on the given day
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("kernel-logs-{}.txt", now.format("%Y-%m-%d"))
}
