//! Help desk entry point: loads configuration, wires adapters and serves the
//! HTML application.

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use mockable::{Clock, DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use servicedesk::inbound::http::health::HealthState;
use servicedesk::inbound::http::session_config::{
    BuildMode, fingerprint::key_fingerprint, session_settings_from_env,
};
use servicedesk::inbound::http::state::HttpState;
use servicedesk::outbound::credentials::Argon2CredentialHasher;
use servicedesk::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use servicedesk::outbound::session_store::MemorySessionStore;
use servicedesk::server::{
    AppDependencies, ServerSettings, create_server, memory_http_state, postgres_http_state,
    seed_admin,
};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().wrap_err("failed to load configuration")?;
    let mode = BuildMode::current();
    let session = session_settings_from_env(&DefaultEnv::new(), mode)
        .wrap_err("invalid session configuration")?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        "session signing key loaded"
    );

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let hasher = Arc::new(Argon2CredentialHasher::new());
    let (http_state, pool) = build_state(&settings, clock.clone(), hasher).await?;

    seed_admin(
        http_state.credentials.as_ref(),
        settings.admin_username(),
        settings.admin_password(),
        mode,
    )
    .await
    .wrap_err("failed to seed admin account")?;

    let deps = AppDependencies {
        http_state: web::Data::new(http_state),
        health_state: web::Data::new(HealthState::new(pool)),
        session_store: MemorySessionStore::new(clock),
        key: session.key,
        cookie_secure: session.cookie_secure,
        same_site: session.same_site,
        session_ttl: settings.session_ttl(),
    };
    let bind_addr = settings.bind_addr();
    info!(%bind_addr, "starting help desk server");
    create_server(deps, bind_addr)?.await?;
    Ok(())
}

async fn build_state(
    settings: &ServerSettings,
    clock: Arc<dyn Clock>,
    hasher: Arc<Argon2CredentialHasher>,
) -> Result<(HttpState, Option<DbPool>)> {
    let Some(database_url) = settings.database_url() else {
        warn!("no database configured; data is kept in memory and lost on restart");
        let state = memory_http_state(clock, hasher).wrap_err("failed to build state")?;
        return Ok((state, None));
    };

    run_migrations(database_url)
        .await
        .wrap_err("failed to apply database migrations")?;
    let pool = DbPool::connect(PoolConfig::new(database_url))
        .await
        .wrap_err("failed to create database pool")?;
    let state = postgres_http_state(&pool, clock, hasher).wrap_err("failed to build state")?;
    Ok((state, Some(pool)))
}
