//! User records and the credential check.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::UserId;

/// Message returned for any failed login, whichever field was wrong.
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid username or password";

/// A seeded account. Compared by plain string equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password: String,
    pub role: String,
    pub name: String,
}

/// The public part of a [`User`], safe to return to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub role: String,
    pub name: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            role: user.role.clone(),
            name: user.name.clone(),
        }
    }
}

/// Find the user whose username and password both match exactly.
pub fn check_credentials(
    users: &[User],
    username: &str,
    password: &str,
) -> Result<UserProfile, CoreError> {
    users
        .iter()
        .find(|u| u.username == username && u.password == password)
        .map(UserProfile::from)
        .ok_or_else(|| CoreError::Unauthorized(MSG_INVALID_CREDENTIALS.into()))
}
