//! Builders wiring repositories into the HTTP state.
//!
//! Both variants share [`assemble`]; they differ only in which driven
//! adapters back the services.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    EventLogRepository, PasswordHashError, PasswordHasher, TicketRepository, UserRepository,
};
use crate::domain::{CredentialService, EventLog, TicketService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{
    MemoryEventLogRepository, MemoryTicketRepository, MemoryUserRepository,
};
use crate::outbound::persistence::{
    DbPool, DieselEventLogRepository, DieselTicketRepository, DieselUserRepository,
};

fn assemble<U, T, H>(
    users: Arc<U>,
    tickets: Arc<T>,
    log: Arc<dyn EventLogRepository>,
    clock: Arc<dyn Clock>,
    hasher: Arc<H>,
) -> Result<HttpState, PasswordHashError>
where
    U: UserRepository + 'static,
    T: TicketRepository + 'static,
    H: PasswordHasher + 'static,
{
    let events = EventLog::new(log, clock.clone());
    let credentials = CredentialService::new(users, hasher, events.clone())?;
    let tickets = TicketService::new(tickets, clock, events.clone());
    Ok(HttpState::new(
        Arc::new(credentials),
        Arc::new(tickets),
        events,
    ))
}

/// State over process-local repositories. Data is lost on restart.
pub fn memory_http_state<H>(
    clock: Arc<dyn Clock>,
    hasher: Arc<H>,
) -> Result<HttpState, PasswordHashError>
where
    H: PasswordHasher + 'static,
{
    let users = Arc::new(MemoryUserRepository::new());
    let tickets = Arc::new(MemoryTicketRepository::new(users.clone()));
    assemble(
        users,
        tickets,
        Arc::new(MemoryEventLogRepository::new()),
        clock,
        hasher,
    )
}

/// State over the PostgreSQL adapters sharing one pool.
pub fn postgres_http_state<H>(
    pool: &DbPool,
    clock: Arc<dyn Clock>,
    hasher: Arc<H>,
) -> Result<HttpState, PasswordHashError>
where
    H: PasswordHasher + 'static,
{
    assemble(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselTicketRepository::new(pool.clone())),
        Arc::new(DieselEventLogRepository::new(pool.clone())),
        clock,
        hasher,
    )
}
