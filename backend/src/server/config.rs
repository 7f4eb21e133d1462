//! Process configuration loaded via OrthoConfig.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_SESSION_TTL_MINUTES: i64 = 120;

/// Settings read from `SERVICEDESK_*` environment variables, configuration
/// files and command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SERVICEDESK")]
pub struct ServerSettings {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL connection string. Unset runs on in-memory adapters.
    pub database_url: Option<String>,
    /// Account seeded with the admin role on startup.
    pub admin_username: Option<String>,
    /// Password for the seeded admin account.
    pub admin_password: Option<String>,
    /// Idle lifetime of a session.
    #[ortho_config(default = 120)]
    pub session_ttl_minutes: i64,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or_else(default_bind_addr)
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn admin_username(&self) -> &str {
        self.admin_username
            .as_deref()
            .unwrap_or(DEFAULT_ADMIN_USERNAME)
    }

    pub fn admin_password(&self) -> Option<&str> {
        self.admin_password
            .as_deref()
            .filter(|password| !password.is_empty())
    }

    /// Session lifetime; non-positive values fall back to the default.
    pub fn session_ttl(&self) -> actix_web::cookie::time::Duration {
        let minutes = match self.session_ttl_minutes {
            minutes if minutes > 0 => minutes,
            _ => DEFAULT_SESSION_TTL_MINUTES,
        };
        actix_web::cookie::time::Duration::minutes(minutes)
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3001))
}
