//! Port for one-way credential hashing.

use super::define_port_error;

define_port_error! {
    /// Failures raised while producing a credential hash.
    pub enum PasswordHashError {
        Hash { message: String } => "password hashing failed: {message}",
    }
}

/// Produces and checks one-way credential hashes.
///
/// Implementations are CPU bound; callers run them off the async executor.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh random salt.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check `password` against `hash`. Malformed hashes count as a mismatch.
    fn verify(&self, password: &str, hash: &str) -> bool;
}
