//! Port for the append-only operational log.

use async_trait::async_trait;

use crate::domain::LogEntry;

use super::define_port_error;

define_port_error! {
    /// Errors raised by event log adapters.
    pub enum EventLogError {
        Connection { message: String } => "event log connection failed: {message}",
        Query { message: String } => "event log query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventLogRepository: Send + Sync {
    async fn append(&self, entry: &LogEntry) -> Result<(), EventLogError>;

    /// Most recent `limit` entries, newest first.
    async fn tail(&self, limit: usize) -> Result<Vec<LogEntry>, EventLogError>;
}
