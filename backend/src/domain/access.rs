//! Access control guard.
//!
//! Handlers call the guard before touching any data. Tier one checks that a
//! session exists; tier two additionally requires a role. Ownership of
//! individual tickets is enforced inside the ticket lookup itself (see
//! [`crate::domain::ports::TicketScope`]).
//!
//! Every failed check is written to the event log with the actor (when known),
//! the resource and the outcome.

use crate::domain::{Error, EventLog, Role, SessionUser};

/// Message attached to [`crate::domain::ErrorCode::Unauthorized`] failures.
pub const LOGIN_REQUIRED: &str = "Please log in to continue.";
/// Message attached to [`crate::domain::ErrorCode::Forbidden`] failures.
pub const ADMINS_ONLY: &str = "Forbidden: Admins only.";

/// Composable authentication and role checks.
#[derive(Clone)]
pub struct AccessGuard {
    events: EventLog,
}

impl AccessGuard {
    pub fn new(events: EventLog) -> Self {
        Self { events }
    }

    /// Tier one: pass through the session user or fail with `Unauthorized`.
    pub async fn require_authenticated(
        &self,
        session: Option<SessionUser>,
        resource: &str,
    ) -> Result<SessionUser, Error> {
        match session {
            Some(user) => Ok(user),
            None => {
                self.events
                    .warn(format!(
                        "Access denied: anonymous request for {resource} (login required)"
                    ))
                    .await;
                Err(Error::unauthorized(LOGIN_REQUIRED))
            }
        }
    }

    /// Tier two: authenticated and holding `role`, otherwise `Forbidden`.
    pub async fn require_role(
        &self,
        session: Option<SessionUser>,
        role: Role,
        resource: &str,
    ) -> Result<SessionUser, Error> {
        let user = self.require_authenticated(session, resource).await?;
        if user.role == role {
            return Ok(user);
        }
        self.events
            .warn(format!(
                "Access denied: {} (role {}) requested {resource} (requires {role})",
                user.username, user.role
            ))
            .await;
        Err(Error::forbidden(ADMINS_ONLY))
    }

    /// Record a tier-two ownership miss: the lookup found nothing visible to
    /// `viewer`, whether or not the ticket exists.
    pub async fn record_hidden_resource(&self, viewer: &SessionUser, resource: &str) {
        self.events
            .warn(format!(
                "Access denied: {} requested {resource} (not found or not owned)",
                viewer.username
            ))
            .await;
    }
}
