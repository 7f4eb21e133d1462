//! Session cookie settings read from the `SESSION_*` environment contract.
//!
//! Debug builds fall back to safe defaults with a warning; release builds
//! refuse to start on a missing or invalid toggle.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::warn;
use zeroize::Zeroize;

pub mod fingerprint;

const VAR_KEY_FILE: &str = "SESSION_KEY_FILE";
const VAR_COOKIE_SECURE: &str = "SESSION_COOKIE_SECURE";
const VAR_SAME_SITE: &str = "SESSION_SAMESITE";
const VAR_ALLOW_EPHEMERAL: &str = "SESSION_ALLOW_EPHEMERAL";

const KEY_FILE_FALLBACK: &str = "/var/run/secrets/session_key";
const MIN_KEY_BYTES: usize = 64;

const ACCEPTED_FLAGS: &str = "one of 1, 0, true, false, yes, no, y, n";
const ACCEPTED_SAME_SITE: &str = "one of Strict, Lax, None";

/// Whether configuration problems are fatal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// The mode this binary was compiled in.
    #[must_use]
    pub fn current() -> Self {
        match cfg!(debug_assertions) {
            true => Self::Debug,
            false => Self::Release,
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated cookie settings.
pub struct SessionSettings {
    /// Signs the session cookie.
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("{name} must be set in release builds")]
    MissingEnv { name: &'static str },
    #[error("{name}={value:?} is not valid ({expected})")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("cannot read session key file {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key file {path} holds {length} bytes; at least {min_len} are required")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("a SameSite=None cookie must also be Secure")]
    InsecureSameSiteNone,
    #[error("ephemeral session keys are refused in release builds")]
    EphemeralNotAllowed,
}

/// Read and validate the session cookie settings.
///
/// # Errors
///
/// In release builds, any missing or malformed variable, a short or unreadable
/// key file, or an insecure combination is an error.
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = flag(env, mode, VAR_COOKIE_SECURE, true)?;
    let same_site = same_site(env, mode, cookie_secure)?;
    let allow_ephemeral = flag(env, mode, VAR_ALLOW_EPHEMERAL, false)?;
    if allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = signing_key(env, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

/// Boolean toggle; debug builds substitute `debug_default` for missing or
/// unparsable values.
fn flag<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    debug_default: bool,
) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(name) else {
        if mode.is_debug() {
            warn!(variable = name, default = debug_default, "session toggle not set");
            return Ok(debug_default);
        }
        return Err(SessionConfigError::MissingEnv { name });
    };

    match parse_bool(&value) {
        Some(parsed) => Ok(parsed),
        None if mode.is_debug() => {
            warn!(variable = name, %value, default = debug_default, "invalid session toggle");
            Ok(debug_default)
        }
        None => Err(SessionConfigError::InvalidEnv {
            name,
            value,
            expected: ACCEPTED_FLAGS,
        }),
    }
}

fn same_site<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    // Lax in debug so local redirects after login keep the cookie.
    let fallback = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };

    let Some(value) = env.string(VAR_SAME_SITE) else {
        if mode.is_debug() {
            warn!("SESSION_SAMESITE not set; using {fallback}");
            return Ok(fallback);
        }
        return Err(SessionConfigError::MissingEnv { name: VAR_SAME_SITE });
    };

    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" if mode.is_debug() => {
            warn!("SESSION_SAMESITE=None without a secure cookie; browsers may drop it");
            Ok(SameSite::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ if mode.is_debug() => {
            warn!(%value, "invalid SESSION_SAMESITE; using {fallback}");
            Ok(fallback)
        }
        _ => Err(SessionConfigError::InvalidEnv {
            name: VAR_SAME_SITE,
            value,
            expected: ACCEPTED_SAME_SITE,
        }),
    }
}

fn signing_key<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(VAR_KEY_FILE)
            .unwrap_or_else(|| KEY_FILE_FALLBACK.to_owned()),
    );

    let mut bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(path = %path.display(), %error, "using temporary session key (dev only)");
            return Ok(Key::generate());
        }
        Err(source) => return Err(SessionConfigError::KeyRead { path, source }),
    };

    let length = bytes.len();
    if !mode.is_debug() && length < MIN_KEY_BYTES {
        bytes.zeroize();
        return Err(SessionConfigError::KeyTooShort {
            path,
            length,
            min_len: MIN_KEY_BYTES,
        });
    }
    let key = Key::derive_from(&bytes);
    bytes.zeroize();
    Ok(key)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
