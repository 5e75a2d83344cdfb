//! Repository for the seeded `users` collection.

use gatepass_core::access::{check_credentials, UserProfile};

use crate::error::RepoError;
use crate::DbPool;

/// Read-only access to user accounts.
pub struct UserRepo;

impl UserRepo {
    /// Check a username/password pair against the stored users.
    pub async fn authenticate(
        pool: &DbPool,
        username: &str,
        password: &str,
    ) -> Result<UserProfile, RepoError> {
        let snapshot = pool.read().await?;
        Ok(check_credentials(&snapshot.users, username, password)?)
    }
}
