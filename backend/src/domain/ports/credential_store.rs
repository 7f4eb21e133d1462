//! Driving port for registration and login.
//!
//! Inbound adapters authenticate through this trait without importing the
//! hashing or persistence infrastructure, so handler tests can substitute a
//! double.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, User, UserId, Username};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Create a `user` account. A taken username fails with
    /// [`crate::domain::ErrorCode::Conflict`].
    async fn register(&self, registration: &Registration) -> Result<UserId, Error>;

    /// Return the account when the password matches; `None` for an unknown
    /// username or a wrong password alike.
    async fn verify(&self, credentials: &LoginCredentials) -> Result<Option<User>, Error>;

    /// Create an `admin` account named `username` unless one exists. Returns
    /// whether an account was created.
    async fn ensure_admin(&self, username: &Username, password: &str) -> Result<bool, Error>;
}
