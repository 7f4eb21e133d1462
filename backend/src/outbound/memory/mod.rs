//! In-process adapters for running without PostgreSQL.
//!
//! Used when no database URL is configured and by the HTTP integration
//! tests. State lives for the lifetime of the process.

mod event_log;
mod tickets;
mod users;

pub use event_log::MemoryEventLogRepository;
pub use tickets::MemoryTicketRepository;
pub use users::MemoryUserRepository;
