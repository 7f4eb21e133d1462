//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on the driving
//! ports, so handler tests can swap in doubles.

use std::sync::Arc;

use crate::domain::ports::{CredentialStore, TicketStore};
use crate::domain::{AccessGuard, EventLog};

#[derive(Clone)]
pub struct HttpState {
    pub credentials: Arc<dyn CredentialStore>,
    pub tickets: Arc<dyn TicketStore>,
    pub guard: AccessGuard,
    pub events: EventLog,
}

impl HttpState {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        tickets: Arc<dyn TicketStore>,
        events: EventLog,
    ) -> Self {
        Self {
            credentials,
            tickets,
            guard: AccessGuard::new(events.clone()),
            events,
        }
    }
}
