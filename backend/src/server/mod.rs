//! Server construction and middleware wiring.

mod admin_seed;
mod config;
mod state_builders;

pub use admin_seed::{AdminSeedError, AdminSeedOutcome, DEBUG_ADMIN_PASSWORD, seed_admin};
pub use config::ServerSettings;
pub use state_builders::{memory_http_state, postgres_http_state};

use std::net::SocketAddr;

use actix_session::{SessionMiddleware, config::PersistentSession};
use actix_web::cookie::{Key, SameSite, time::Duration};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpServer, web};

use crate::inbound::http::configure;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::middleware::{RequestLog, Trace};
use crate::outbound::session_store::MemorySessionStore;

/// Name of the session cookie. Its value is an opaque store key.
pub const SESSION_COOKIE_NAME: &str = "session";

/// Everything a worker needs to build the application.
#[derive(Clone)]
pub struct AppDependencies {
    pub http_state: web::Data<HttpState>,
    pub health_state: web::Data<HealthState>,
    pub session_store: MemorySessionStore,
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
    pub session_ttl: Duration,
}

fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((
            "Content-Security-Policy",
            "default-src 'self'; script-src 'self'",
        ))
        .add(("Referrer-Policy", "no-referrer"))
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
}

/// Assemble the application with session, access log, security header and
/// trace middleware around every route.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        health_state,
        session_store,
        key,
        cookie_secure,
        same_site,
        session_ttl,
    } = deps;

    let session = SessionMiddleware::builder(session_store, key)
        .cookie_name(SESSION_COOKIE_NAME.into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(same_site)
        .session_lifecycle(PersistentSession::default().session_ttl(session_ttl))
        .build();
    let request_log = RequestLog::new(http_state.events.clone());

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(session)
        .wrap(request_log)
        .wrap(security_headers())
        .wrap(Trace)
        .service(ready)
        .service(live)
        .configure(configure)
}

/// Bind an Actix HTTP server and mark the process ready.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(deps: AppDependencies, bind_addr: SocketAddr) -> std::io::Result<Server> {
    let health_state = deps.health_state.clone();
    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();
    health_state.mark_ready();
    Ok(server)
}
