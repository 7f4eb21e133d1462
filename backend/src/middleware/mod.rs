//! Request middleware.
//!
//! Purpose: request lifecycle concerns that sit outside individual handlers,
//! namely trace identifiers and the access log.

pub mod request_log;
pub mod trace;

pub use request_log::RequestLog;
pub use trace::Trace;
