//! # Device Diagnostics Log
//!
//! This crate implements structured logging for device operations.
//!
//! ## Philosophy
//!
//! Logging is explicit and structured, not text-based or printf-style.
//! Devices emit [`LogEntry`] values into a [`LogSink`]; what happens to
//! them (collection, filtering, display) is the sink's concern.

use device_types::SessionId;
use std::sync::{Mutex, PoisonError};

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Debug information
    Debug,
    /// Informational messages
    Info,
    /// Warnings
    Warn,
    /// Errors
    Error,
}

/// A structured log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Session that triggered the entry (if any)
    pub source: Option<SessionId>,
    /// Log message
    pub message: String,
    /// Structured fields
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    /// Creates a new log entry
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            source: None,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Sets the originating session
    pub fn with_source(mut self, source: SessionId) -> Self {
        self.source = Some(source);
        self
    }

    /// Adds a field to the log entry
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    /// Returns the value of a field, if present
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Destination for log entries
///
/// Sinks are shared between threads (a device may be opened from any
/// thread), so recording takes `&self`.
pub trait LogSink: Send + Sync {
    /// Records one entry
    fn record(&self, entry: LogEntry);
}

/// In-memory log sink
///
/// Collects entries in order of arrival; used by tests and demos to
/// assert on diagnostic output.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLog {
    /// Creates an empty in-memory log
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all recorded entries
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock_entries().clone()
    }

    /// Returns the number of recorded entries
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    /// Returns whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    /// Discards all recorded entries
    pub fn clear(&self) {
        self.lock_entries().clear();
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
        // Entries are append-only, so a poisoned lock still holds valid data.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink for MemoryLog {
    fn record(&self, entry: LogEntry) {
        self.lock_entries().push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_log_entry_creation() {
        let entry = LogEntry::new(LogLevel::Info, "test message");
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.message, "test message");
        assert!(entry.source.is_none());
        assert!(entry.fields.is_empty());
    }

    #[test]
    fn test_log_entry_with_source() {
        let session = SessionId::new();
        let entry = LogEntry::new(LogLevel::Info, "test").with_source(session);
        assert_eq!(entry.source, Some(session));
    }

    #[test]
    fn test_log_entry_fields() {
        let entry = LogEntry::new(LogLevel::Info, "test")
            .with_field("device", "msgslot")
            .with_field("bytes", "12");

        assert_eq!(entry.field("device"), Some("msgslot"));
        assert_eq!(entry.field("bytes"), Some("12"));
        assert_eq!(entry.field("missing"), None);
    }

    #[test]
    fn test_memory_log_records_in_order() {
        let log = MemoryLog::new();
        log.record(LogEntry::new(LogLevel::Info, "first"));
        log.record(LogEntry::new(LogLevel::Warn, "second"));

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "first");
        assert_eq!(entries[1].message, "second");
        assert_eq!(entries[1].level, LogLevel::Warn);
    }

    #[test]
    fn test_memory_log_clear() {
        let log = MemoryLog::new();
        log.record(LogEntry::new(LogLevel::Debug, "x"));
        assert!(!log.is_empty());
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
    }
}
