use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{UserCredentials, UserPersistenceError, UserRepository};
use crate::domain::{User, UserId};

/// Accounts keyed by insertion order; usernames are unique and compared
/// exactly.
#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<Vec<UserCredentials>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> UserPersistenceError {
        UserPersistenceError::connection("user store lock poisoned")
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, record: &UserCredentials) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().map_err(|_| Self::poisoned())?;
        if users
            .iter()
            .any(|existing| existing.user.username() == record.user.username())
        {
            return Err(UserPersistenceError::duplicate_username());
        }
        users.push(record.clone());
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        let users = self.users.read().map_err(|_| Self::poisoned())?;
        Ok(users
            .iter()
            .find(|record| record.user.username().as_str() == username)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.read().map_err(|_| Self::poisoned())?;
        Ok(users
            .iter()
            .find(|record| record.user.id() == *id)
            .map(|record| record.user.clone()))
    }
}
