//! Credential store service: registration, login verification and admin
//! seeding.
//!
//! Passwords are hashed off the async executor. Login verification performs
//! exactly one hash comparison whether or not the username exists, so the
//! two failure paths cost the same.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{
    CredentialStore, PasswordHashError, PasswordHasher, UserCredentials, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    Error, EventLog, LoginCredentials, Registration, Role, User, UserId, Username,
};

/// Shown for duplicate usernames without confirming which field collided.
pub const REGISTRATION_FAILED: &str = "Registration failed. Username may already be taken.";

const DUMMY_PASSWORD: &str = "servicedesk-timing-equaliser";

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername => Error::conflict(REGISTRATION_FAILED),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

/// Implements [`CredentialStore`] over a user repository and a hasher.
pub struct CredentialService<R, H> {
    users: Arc<R>,
    hasher: Arc<H>,
    events: EventLog,
    dummy_hash: String,
}

impl<R, H> CredentialService<R, H>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
{
    /// Build the service. Computes the dummy hash used for unknown usernames.
    pub fn new(users: Arc<R>, hasher: Arc<H>, events: EventLog) -> Result<Self, PasswordHashError> {
        let dummy_hash = hasher.hash(DUMMY_PASSWORD)?;
        Ok(Self {
            users,
            hasher,
            events,
            dummy_hash,
        })
    }

    async fn hash_password(&self, password: &str) -> Result<String, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| Error::internal(format!("hashing task failed: {err}")))?
            .map_err(map_hash_error)
    }

    async fn verify_password(&self, password: &str, hash: String) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|err| Error::internal(format!("verification task failed: {err}")))
    }
}

#[async_trait]
impl<R, H> CredentialStore for CredentialService<R, H>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn register(&self, registration: &Registration) -> Result<UserId, Error> {
        let username = registration.username();
        let password_hash = match self.hash_password(registration.password()).await {
            Ok(hash) => hash,
            Err(err) => {
                return Err(self
                    .events
                    .report(&format!("Registration error for {username}"), err)
                    .await);
            }
        };
        let user = User::new(UserId::random(), username.clone(), Role::User);
        let id = user.id();
        let record = UserCredentials {
            user,
            password_hash,
        };

        match self.users.insert(&record).await {
            Ok(()) => {
                self.events
                    .info(format!("New user registered: {username}"))
                    .await;
                Ok(id)
            }
            Err(UserPersistenceError::DuplicateUsername) => {
                self.events
                    .warn(format!("Registration failed for {username}: username taken"))
                    .await;
                Err(map_user_error(UserPersistenceError::DuplicateUsername))
            }
            Err(other) => Err(self
                .events
                .report(
                    &format!("Registration error for {username}"),
                    map_user_error(other),
                )
                .await),
        }
    }

    async fn verify(&self, credentials: &LoginCredentials) -> Result<Option<User>, Error> {
        let username = credentials.username();
        let record = match self.users.find_by_username(username).await {
            Ok(record) => record,
            Err(err) => {
                return Err(self
                    .events
                    .report(
                        &format!("Login lookup error for {username}"),
                        map_user_error(err),
                    )
                    .await);
            }
        };

        let (hash, candidate) = match record {
            Some(UserCredentials {
                user,
                password_hash,
            }) => (password_hash, Some(user)),
            None => (self.dummy_hash.clone(), None),
        };
        let matches = self.verify_password(credentials.password(), hash).await?;

        match candidate {
            Some(user) if matches => {
                self.events
                    .info(format!("User logged in: {username}"))
                    .await;
                Ok(Some(user))
            }
            _ => {
                self.events
                    .warn(format!("Login failed for {username}"))
                    .await;
                Ok(None)
            }
        }
    }

    async fn ensure_admin(&self, username: &Username, password: &str) -> Result<bool, Error> {
        let existing = self
            .users
            .find_by_username(username.as_str())
            .await
            .map_err(map_user_error)?;
        if existing.is_some() {
            debug!(%username, "admin account already present");
            return Ok(false);
        }

        let password_hash = self.hash_password(password).await?;
        let record = UserCredentials {
            user: User::new(UserId::random(), username.clone(), Role::Admin),
            password_hash,
        };
        match self.users.insert(&record).await {
            Ok(()) => {
                self.events
                    .info(format!("Admin account created: {username}"))
                    .await;
                Ok(true)
            }
            // Another process seeded it first.
            Err(UserPersistenceError::DuplicateUsername) => Ok(false),
            Err(other) => Err(map_user_error(other)),
        }
    }
}

#[cfg(test)]
#[path = "credential_service_tests.rs"]
mod tests;
