//! Bounded history of recent transport failures, newest first.

use std::{
    collections::VecDeque,
    fmt,
    sync::{Mutex, MutexGuard, PoisonError},
};

use chrono::Local;
use serde::Serialize;

pub const ERROR_LOG_CAPACITY: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Local wall-clock time, `HH:MM:SS`.
    pub timestamp: String,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp, self.message)
    }
}

#[derive(Default)]
pub struct ErrorLog {
    entries: Mutex<VecDeque<LogEntry>>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, message: impl Into<String>) -> LogEntry {
        let entry = LogEntry {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            message: message.into(),
        };
        let mut entries = self.lock();
        entries.push_front(entry.clone());
        entries.truncate(ERROR_LOG_CAPACITY);
        entry
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<LogEntry> {
        self.lock().front().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
