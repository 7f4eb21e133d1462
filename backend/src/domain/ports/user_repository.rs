//! Port abstraction for account persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The unique username constraint rejected an insert.
        DuplicateUsername => "username already registered",
    }
}

/// Account together with its stored credential hash.
///
/// Only the credential store sees this type; everything above it works with
/// [`User`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Existing usernames fail with
    /// [`UserPersistenceError::DuplicateUsername`] and leave the stored record
    /// untouched.
    async fn insert(&self, record: &UserCredentials) -> Result<(), UserPersistenceError>;

    /// Exact (case-sensitive) username lookup.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, UserPersistenceError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;
}
