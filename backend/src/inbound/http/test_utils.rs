//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

use super::state::HttpState;
use crate::domain::EventLog;
use crate::domain::ports::{MockCredentialStore, MockTicketStore};
use crate::outbound::session_store::MemorySessionStore;
use crate::test_support::{MutableClock, RecordingLog};

pub const SESSION_COOKIE: &str = "session";

/// Session middleware over a fresh in-memory store, with `Secure` disabled
/// for plain-HTTP tests. The store is returned for assertions.
pub fn test_session_middleware() -> (SessionMiddleware<MemorySessionStore>, MemorySessionStore) {
    let store = MemorySessionStore::new(Arc::new(MutableClock::default()));
    let middleware = SessionMiddleware::builder(store.clone(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build();
    (middleware, store)
}

/// The session cookie set by `response`, if any.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
}

/// Handler state over mocked driving ports and a recording event log.
pub fn test_http_state(
    credentials: MockCredentialStore,
    tickets: MockTicketStore,
) -> (HttpState, Arc<RecordingLog>) {
    let log = Arc::new(RecordingLog::default());
    let events = EventLog::new(log.clone(), Arc::new(MutableClock::default()));
    let state = HttpState::new(Arc::new(credentials), Arc::new(tickets), events);
    (state, log)
}

/// The value of the hidden `_csrf` field in a rendered form.
pub fn extract_csrf(html: &str) -> Option<String> {
    const MARKER: &str = "name=\"_csrf\" value=\"";
    let start = html.find(MARKER)? + MARKER.len();
    let rest = html.get(start..)?;
    let end = rest.find('"')?;
    rest.get(..end).map(str::to_owned)
}
