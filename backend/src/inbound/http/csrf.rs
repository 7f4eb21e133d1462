//! Per-session CSRF tokens.
//!
//! Each session holds one random token; every form carries it in the hidden
//! `_csrf` field and every state-changing POST checks it before doing
//! anything else.

use rand::RngCore;
use subtle::ConstantTimeEq;

use crate::domain::{Error, EventLog};

use super::session::SessionContext;

/// Shown for a missing or mismatched token.
pub const CSRF_REJECTED: &str = "Form tampered with or session expired.";

const TOKEN_BYTES: usize = 32;

pub(crate) fn generate_token() -> String {
    let mut bytes = [0_u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn tokens_match(expected: &str, submitted: &str) -> bool {
    !submitted.is_empty() && bool::from(expected.as_bytes().ct_eq(submitted.as_bytes()))
}

/// Check `submitted` against the session's token.
///
/// # Errors
///
/// `Forbidden` with [`CSRF_REJECTED`] when the session has no token or the
/// tokens differ. The rejection is recorded as a `WARN` event.
pub async fn verify(
    session: &SessionContext,
    submitted: &str,
    path: &str,
    events: &EventLog,
) -> Result<(), Error> {
    let valid = session
        .stored_csrf_token()
        .is_some_and(|expected| tokens_match(&expected, submitted));
    if valid {
        return Ok(());
    }
    events.warn(format!("CSRF token error on path: {path}")).await;
    Err(Error::forbidden(CSRF_REJECTED))
}
