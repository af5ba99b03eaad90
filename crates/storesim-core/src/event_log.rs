//! Bounded, timestamped event log.
//!
//! The log is the human-readable trail of what happened in the store. It
//! holds at most `capacity` entries and evicts the oldest on overflow.
//! Every append is mirrored to `tracing` under the `storesim::events`
//! target.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

/// One line of the event log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// When the entry was appended.
    pub at: DateTime<Utc>,
    /// Free-form message.
    pub message: String,
}

impl core::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{}] {}", self.at.format("%Y-%m-%d %H:%M:%S"), self.message)
    }
}

/// FIFO log with a fixed capacity.
#[derive(Debug)]
pub struct EventLog {
    capacity: usize,
    entries: Mutex<VecDeque<LogEntry>>,
}

impl EventLog {
    /// Create an empty log. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
        }
    }

    /// Maximum number of retained entries.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a message stamped with the current time.
    pub async fn append(&self, message: impl Into<String>) {
        let entry = LogEntry {
            at: Utc::now(),
            message: message.into(),
        };
        tracing::info!(target: "storesim::events", "{}", entry.message);

        let mut entries = self.entries.lock().await;
        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    /// The last `n` entries, formatted, oldest first.
    pub async fn tail(&self, n: usize) -> Vec<String> {
        let entries = self.entries.lock().await;
        let skip = entries.len().saturating_sub(n);
        entries.iter().skip(skip).map(ToString::to_string).collect()
    }

    /// All retained entries, oldest first.
    pub async fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().await.iter().cloned().collect()
    }

    /// Number of retained entries.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether the log is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}
