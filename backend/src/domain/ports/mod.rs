//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`]) are implemented by
//! outbound adapters; driving ports ([`CredentialStore`], [`TicketStore`]) are
//! what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod credential_store;
mod event_log_repository;
mod password_hasher;
mod ticket_repository;
mod ticket_store;
mod user_repository;

#[cfg(test)]
pub use credential_store::MockCredentialStore;
pub use credential_store::CredentialStore;
#[cfg(test)]
pub use event_log_repository::MockEventLogRepository;
pub use event_log_repository::{EventLogError, EventLogRepository};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use ticket_repository::MockTicketRepository;
pub use ticket_repository::{NewComment, TicketPersistenceError, TicketRepository, TicketScope};
#[cfg(test)]
pub use ticket_store::MockTicketStore;
pub use ticket_store::TicketStore;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserCredentials, UserPersistenceError, UserRepository};
