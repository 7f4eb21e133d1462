//! Session manager surface for handlers.
//!
//! Wraps the Actix session so handlers deal only in [`SessionUser`]
//! snapshots. State lives server-side (see
//! [`crate::outbound::session_store`]); the cookie carries an opaque key.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, SessionUser, User};

use super::csrf;

pub(crate) const SESSION_USER_KEY: &str = "user";
pub(crate) const CSRF_TOKEN_KEY: &str = "csrf";

#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Bind `user` to this browser. The session key is renewed so a key
    /// planted before login cannot be reused afterwards, and the CSRF token
    /// is rotated.
    pub fn establish(&self, user: &User) -> Result<SessionUser, Error> {
        let snapshot = SessionUser::from(user);
        self.0.renew();
        self.0
            .insert(SESSION_USER_KEY, &snapshot)
            .map_err(|err| Error::internal(format!("failed to persist session: {err}")))?;
        self.0
            .insert(CSRF_TOKEN_KEY, csrf::generate_token())
            .map_err(|err| Error::internal(format!("failed to persist session: {err}")))?;
        Ok(snapshot)
    }

    /// The signed-in user, if any. Unreadable state counts as anonymous.
    pub fn resolve(&self) -> Option<SessionUser> {
        match self.0.get::<SessionUser>(SESSION_USER_KEY) {
            Ok(user) => user,
            Err(error) => {
                warn!(%error, "unreadable session state; treating request as anonymous");
                None
            }
        }
    }

    /// Drop all server-side state for this session. Safe to call repeatedly.
    pub fn destroy(&self) {
        self.0.purge();
    }

    /// The session's CSRF token, created on first use.
    pub fn csrf_token(&self) -> Result<String, Error> {
        if let Some(token) = self.stored_csrf_token() {
            return Ok(token);
        }
        let token = csrf::generate_token();
        self.0
            .insert(CSRF_TOKEN_KEY, &token)
            .map_err(|err| Error::internal(format!("failed to persist session: {err}")))?;
        Ok(token)
    }

    pub(crate) fn stored_csrf_token(&self) -> Option<String> {
        self.0.get::<String>(CSRF_TOKEN_KEY).ok().flatten()
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
