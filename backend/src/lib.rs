//! Help desk ticketing service.
//!
//! Members file tickets and follow up with comments; admins triage every
//! ticket, keep internal notes and review the event log.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(test)]
pub(crate) mod test_support;

pub use middleware::Trace;
