//! Startup seeding of the admin account.

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::ports::CredentialStore;
use crate::domain::{Username, UserValidationError};
use crate::inbound::http::session_config::BuildMode;

/// Password used in debug builds when none is configured.
pub const DEBUG_ADMIN_PASSWORD: &str = "admin123";

/// Outcome of [`seed_admin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminSeedOutcome {
    Created,
    AlreadyPresent,
    Skipped,
}

#[derive(Debug, Error)]
pub enum AdminSeedError {
    #[error("invalid admin username: {0}")]
    Username(#[from] UserValidationError),
    #[error("admin seeding failed: {0}")]
    Store(#[from] crate::domain::Error),
}

/// Create the admin account unless it already exists.
///
/// Without a configured password, debug builds fall back to
/// [`DEBUG_ADMIN_PASSWORD`] and release builds skip seeding.
pub async fn seed_admin(
    credentials: &dyn CredentialStore,
    username: &str,
    password: Option<&str>,
    mode: BuildMode,
) -> Result<AdminSeedOutcome, AdminSeedError> {
    let username = Username::new(username)?;
    let password = match (password, mode) {
        (Some(password), _) => password,
        (None, BuildMode::Debug) => {
            warn!(%username, "no admin password configured; using the development default");
            DEBUG_ADMIN_PASSWORD
        }
        (None, BuildMode::Release) => {
            warn!(%username, "no admin password configured; admin seeding skipped");
            return Ok(AdminSeedOutcome::Skipped);
        }
    };

    if credentials.ensure_admin(&username, password).await? {
        info!(%username, "admin account seeded");
        Ok(AdminSeedOutcome::Created)
    } else {
        info!(%username, "admin account already present; skipping");
        Ok(AdminSeedOutcome::AlreadyPresent)
    }
}
