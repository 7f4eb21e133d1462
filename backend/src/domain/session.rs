//! Session snapshot carried by an authenticated browser.

use serde::{Deserialize, Serialize};

use super::user::{Role, User, UserId};

/// Identity captured at login.
///
/// The snapshot holds only `{userId, username, role}`; credential material is
/// never part of it. It is point-in-time: a later role change on the account
/// is not observed until the user logs in again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id(),
            username: user.username().as_str().to_owned(),
            role: user.role(),
        }
    }
}
