//! Operational event log.
//!
//! Every record is persisted for the admin log viewer and mirrored to
//! `tracing` at the matching level. Recording never fails the caller: a
//! persistence failure is reported through `tracing` only.

use std::sync::Arc;

use mockable::Clock;
use tracing::{error, info, warn};

use crate::domain::ports::{EventLogError, EventLogRepository};
use crate::domain::{Error, LOG_TAIL_LIMIT, LogEntry, LogLevel};

fn map_event_log_error(error: EventLogError) -> Error {
    match error {
        EventLogError::Connection { message } => {
            Error::service_unavailable(format!("event log unavailable: {message}"))
        }
        EventLogError::Query { message } => Error::internal(format!("event log error: {message}")),
    }
}

/// Shared handle for writing and reading log entries.
#[derive(Clone)]
pub struct EventLog {
    repo: Arc<dyn EventLogRepository>,
    clock: Arc<dyn Clock>,
}

impl EventLog {
    pub fn new(repo: Arc<dyn EventLogRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    pub async fn info(&self, message: impl Into<String>) {
        self.record(LogLevel::Info, message).await;
    }

    pub async fn warn(&self, message: impl Into<String>) {
        self.record(LogLevel::Warn, message).await;
    }

    pub async fn error(&self, message: impl Into<String>) {
        self.record(LogLevel::Error, message).await;
    }

    pub async fn record(&self, level: LogLevel, message: impl Into<String>) {
        let entry = LogEntry::new(level, message, self.clock.utc());
        match level {
            LogLevel::Info => info!(event = %entry.message, "event recorded"),
            LogLevel::Warn => warn!(event = %entry.message, "event recorded"),
            LogLevel::Error => error!(event = %entry.message, "event recorded"),
        }
        if let Err(err) = self.repo.append(&entry).await {
            error!(error = %err, level = %level, "failed to persist event log entry");
        }
    }

    /// Most recent [`LOG_TAIL_LIMIT`] entries, newest first.
    pub async fn tail(&self) -> Result<Vec<LogEntry>, Error> {
        self.repo
            .tail(LOG_TAIL_LIMIT)
            .await
            .map_err(map_event_log_error)
    }

    /// Record an internal failure and return the error unchanged, for use in
    /// `map_err` chains.
    pub async fn report(&self, context: &str, err: Error) -> Error {
        self.error(format!("{context}: {err}")).await;
        err
    }
}
