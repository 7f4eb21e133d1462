//! Domain primitives, services and ports.
//!
//! Purpose: define the help-desk model (accounts, session snapshots, tickets,
//! comments, log entries) independently of HTTP and storage, plus the
//! services that implement the credential and ticket use-cases.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Username, Role, SessionUser: identities.
//! - Ticket, TicketDraft, TicketStatus, SearchTerm, Comment: ticket model.
//! - AccessGuard, EventLog, CredentialService, TicketService: services.
//! - ports: traits implemented by inbound and outbound adapters.

pub mod access;
pub mod auth;
pub mod comment;
pub mod credential_service;
pub mod error;
pub mod event_log;
pub mod event_log_service;
pub mod ports;
pub mod session;
pub mod ticket;
pub mod ticket_service;
pub mod trace_id;
pub mod user;

pub use self::access::{ADMINS_ONLY, AccessGuard, LOGIN_REQUIRED};
pub use self::auth::{CredentialValidationError, LoginCredentials, PASSWORD_MIN, Registration};
pub use self::comment::{Comment, CommentBody, CommentKind, EmptyComment};
pub use self::credential_service::{CredentialService, REGISTRATION_FAILED};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::event_log::{LOG_TAIL_LIMIT, LogEntry, LogLevel};
pub use self::event_log_service::EventLog;
pub use self::session::SessionUser;
pub use self::ticket::{
    SUGGESTED_CATEGORIES, SearchTerm, Ticket, TicketDraft, TicketId, TicketOverview,
    TicketStatus, TicketValidationError,
};
pub use self::ticket_service::{TICKET_NOT_FOUND, TicketService};
pub use self::trace_id::TraceId;
pub use self::user::{Role, USERNAME_MAX, User, UserId, UserValidationError, Username};
