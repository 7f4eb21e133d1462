//! Server-side session storage for `actix-session`.
//!
//! The cookie carries only an opaque 64-character key; the session state lives
//! here. Purging a session removes its entry, so a copied cookie stops working
//! the moment its owner logs out.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use actix_session::storage::{LoadError, SaveError, SessionKey, SessionStore, UpdateError};
use actix_web::cookie::time::Duration;
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use mockable::Clock;
use rand::Rng;
use rand::distributions::Alphanumeric;

type SessionState = HashMap<String, String>;

const SESSION_KEY_LEN: usize = 64;

struct StoredSession {
    state: SessionState,
    expires_at: DateTime<Utc>,
}

/// Process-local session store with per-entry expiry.
///
/// Expired entries are dropped lazily whenever the store is written to.
#[derive(Clone)]
pub struct MemorySessionStore {
    sessions: Arc<Mutex<HashMap<String, StoredSession>>>,
    clock: Arc<dyn Clock>,
}

impl MemorySessionStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            clock,
        }
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        let now = self.clock.utc();
        self.lock()
            .map(|sessions| sessions.values().filter(|s| s.expires_at > now).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, HashMap<String, StoredSession>>> {
        self.sessions
            .lock()
            .map_err(|_| anyhow!("session store lock poisoned"))
    }

    fn deadline(&self, ttl: &Duration) -> DateTime<Utc> {
        self.clock.utc() + chrono::Duration::seconds(ttl.whole_seconds())
    }

    fn generate_key() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SESSION_KEY_LEN)
            .map(char::from)
            .collect()
    }

    fn insert_fresh(&self, state: SessionState, ttl: &Duration) -> anyhow::Result<SessionKey> {
        let expires_at = self.deadline(ttl);
        let now = self.clock.utc();
        let mut sessions = self.lock()?;
        sessions.retain(|_, session| session.expires_at > now);

        let mut key = Self::generate_key();
        while sessions.contains_key(&key) {
            key = Self::generate_key();
        }
        sessions.insert(key.clone(), StoredSession { state, expires_at });
        SessionKey::try_from(key).map_err(|err| anyhow!("invalid session key: {err}"))
    }
}

impl SessionStore for MemorySessionStore {
    async fn load(&self, session_key: &SessionKey) -> Result<Option<SessionState>, LoadError> {
        let now = self.clock.utc();
        let sessions = self.lock().map_err(LoadError::Other)?;
        Ok(sessions
            .get(session_key.as_ref())
            .filter(|session| session.expires_at > now)
            .map(|session| session.state.clone()))
    }

    async fn save(
        &self,
        session_state: SessionState,
        ttl: &Duration,
    ) -> Result<SessionKey, SaveError> {
        self.insert_fresh(session_state, ttl)
            .map_err(SaveError::Other)
    }

    async fn update(
        &self,
        session_key: SessionKey,
        session_state: SessionState,
        ttl: &Duration,
    ) -> Result<SessionKey, UpdateError> {
        let expires_at = self.deadline(ttl);
        let now = self.clock.utc();
        {
            let mut sessions = self.lock().map_err(UpdateError::Other)?;
            if let Some(session) = sessions
                .get_mut(session_key.as_ref())
                .filter(|session| session.expires_at > now)
            {
                session.state = session_state;
                session.expires_at = expires_at;
                return Ok(session_key);
            }
        }
        // Unknown or expired keys are never resurrected.
        self.insert_fresh(session_state, ttl)
            .map_err(UpdateError::Other)
    }

    async fn update_ttl(&self, session_key: &SessionKey, ttl: &Duration) -> anyhow::Result<()> {
        let expires_at = self.deadline(ttl);
        let mut sessions = self.lock()?;
        if let Some(session) = sessions.get_mut(session_key.as_ref()) {
            session.expires_at = expires_at;
        }
        Ok(())
    }

    async fn delete(&self, session_key: &SessionKey) -> anyhow::Result<()> {
        self.lock()?.remove(session_key.as_ref());
        Ok(())
    }
}
