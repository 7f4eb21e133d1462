use std::collections::VecDeque;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{EventLogError, EventLogRepository};
use crate::domain::{LOG_TAIL_LIMIT, LogEntry};

const DEFAULT_RETAINED: usize = 25 * LOG_TAIL_LIMIT;

/// Bounded log held in append order; the oldest entries are dropped first.
pub struct MemoryEventLogRepository {
    entries: RwLock<VecDeque<LogEntry>>,
    retained: usize,
}

impl Default for MemoryEventLogRepository {
    fn default() -> Self {
        Self::with_retention(DEFAULT_RETAINED)
    }
}

impl MemoryEventLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `retained` entries (at least one).
    pub fn with_retention(retained: usize) -> Self {
        let retained = retained.max(1);
        Self {
            entries: RwLock::new(VecDeque::with_capacity(retained.min(DEFAULT_RETAINED))),
            retained,
        }
    }
}

#[async_trait]
impl EventLogRepository for MemoryEventLogRepository {
    async fn append(&self, entry: &LogEntry) -> Result<(), EventLogError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| EventLogError::connection("event log lock poisoned"))?;
        if entries.len() == self.retained {
            entries.pop_front();
        }
        entries.push_back(entry.clone());
        Ok(())
    }

    async fn tail(&self, limit: usize) -> Result<Vec<LogEntry>, EventLogError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| EventLogError::connection("event log lock poisoned"))?;
        // Appends follow the clock, so the back of the queue is the newest.
        Ok(entries.iter().rev().take(limit).cloned().collect())
    }
}
