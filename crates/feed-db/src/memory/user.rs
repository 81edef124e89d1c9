//! In-memory implementation of UserRepository

use async_trait::async_trait;
use dashmap::DashMap;

use feed_core::entities::User;
use feed_core::error::DomainError;
use feed_core::traits::{RepoResult, UserRepository};
use feed_core::value_objects::Snowflake;

/// Stored user record with its credential hash
#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

/// In-memory implementation of UserRepository
///
/// A secondary email index enforces the same uniqueness the users table
/// does with its UNIQUE constraint.
#[derive(Debug, Default)]
pub struct MemUserRepository {
    users: DashMap<i64, StoredUser>,
    emails: DashMap<String, i64>,
}

impl MemUserRepository {
    /// Create an empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemUserRepository {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self
            .users
            .get(&id.into_inner())
            .map(|stored| stored.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let Some(id) = self.emails.get(email).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|stored| stored.user.clone()))
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.emails.contains_key(email))
    }

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        use dashmap::mapref::entry::Entry;

        // Claim the email first; the entry shard lock makes the claim atomic.
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => return Err(DomainError::EmailAlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(user.id.into_inner());
            }
        }

        self.users.insert(
            user.id.into_inner(),
            StoredUser {
                user: user.clone(),
                password_hash: password_hash.to_string(),
            },
        );

        Ok(())
    }

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        Ok(self
            .users
            .get(&id.into_inner())
            .map(|stored| stored.password_hash.clone()))
    }
}
