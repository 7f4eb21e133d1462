//! Shared helpers for unit tests inside the crate.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::LogEntry;
use crate::domain::ports::{EventLogError, EventLogRepository};

/// Clock that starts at a fixed instant and only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Default for MutableClock {
    fn default() -> Self {
        Self::new(fixed_now())
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Instant used by fixtures that do not care about the exact time.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
        .single()
        .unwrap_or_else(|| panic!("fixture timestamp is unambiguous"))
}

/// Event log repository that keeps entries in insertion order.
#[derive(Default)]
pub struct RecordingLog(Mutex<Vec<LogEntry>>);

impl RecordingLog {
    pub fn entries(&self) -> Vec<LogEntry> {
        match self.0.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => panic!("log mutex"),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|entry| entry.message).collect()
    }
}

#[async_trait]
impl EventLogRepository for RecordingLog {
    async fn append(&self, entry: &LogEntry) -> Result<(), EventLogError> {
        match self.0.lock() {
            Ok(mut guard) => guard.push(entry.clone()),
            Err(_) => panic!("log mutex"),
        }
        Ok(())
    }

    async fn tail(&self, limit: usize) -> Result<Vec<LogEntry>, EventLogError> {
        Ok(self.entries().into_iter().rev().take(limit).collect())
    }
}
