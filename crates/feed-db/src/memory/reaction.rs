//! In-memory implementation of ReactionRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use feed_core::entities::{Reaction, ReactionKind};
use feed_core::error::DomainError;
use feed_core::traits::{ReactionRepository, RepoResult};
use feed_core::value_objects::Snowflake;

/// Full identity of a stored reaction record
type ReactionKey = (i64, i64, ReactionKind);

/// In-memory implementation of ReactionRepository
///
/// Keyed on the full (user, post, kind) triple, mirroring the primary key
/// of the reactions table. Insert and delete report the same conflict and
/// missing-record errors as the PostgreSQL implementation.
#[derive(Debug, Default)]
pub struct MemReactionRepository {
    reactions: DashMap<ReactionKey, DateTime<Utc>>,
}

impl MemReactionRepository {
    /// Create an empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn key(user_id: Snowflake, post_id: Snowflake, kind: ReactionKind) -> ReactionKey {
        (user_id.into_inner(), post_id.into_inner(), kind)
    }
}

#[async_trait]
impl ReactionRepository for MemReactionRepository {
    async fn exists(
        &self,
        user_id: Snowflake,
        post_id: Snowflake,
        kind: ReactionKind,
    ) -> RepoResult<bool> {
        Ok(self.reactions.contains_key(&Self::key(user_id, post_id, kind)))
    }

    async fn insert(&self, reaction: &Reaction) -> RepoResult<()> {
        use dashmap::mapref::entry::Entry;

        let key = Self::key(reaction.user_id, reaction.post_id, reaction.kind);
        // The entry API holds the shard lock, so claiming a key is atomic
        // even against a racing insert of the same triple.
        match self.reactions.entry(key) {
            Entry::Occupied(_) => Err(DomainError::ReactionAlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(reaction.created_at);
                Ok(())
            }
        }
    }

    async fn delete(
        &self,
        user_id: Snowflake,
        post_id: Snowflake,
        kind: ReactionKind,
    ) -> RepoResult<()> {
        self.reactions
            .remove(&Self::key(user_id, post_id, kind))
            .map(|_| ())
            .ok_or(DomainError::ReactionNotFound)
    }

    async fn count_for_post(&self, post_id: Snowflake, kind: ReactionKind) -> RepoResult<i64> {
        let post_id = post_id.into_inner();
        let count = self
            .reactions
            .iter()
            .filter(|entry| entry.key().1 == post_id && entry.key().2 == kind)
            .count();

        Ok(count as i64)
    }

    async fn list_post_ids_by_user(
        &self,
        user_id: Snowflake,
        kind: ReactionKind,
        limit: i64,
    ) -> RepoResult<Vec<Snowflake>> {
        let user_id = user_id.into_inner();
        let limit = limit.clamp(1, 100) as usize;

        let mut hits: Vec<(i64, DateTime<Utc>)> = self
            .reactions
            .iter()
            .filter(|entry| entry.key().0 == user_id && entry.key().2 == kind)
            .map(|entry| (entry.key().1, *entry.value()))
            .collect();

        hits.sort_by(|a, b| b.1.cmp(&a.1));
        hits.truncate(limit);

        Ok(hits.into_iter().map(|(id, _)| Snowflake::new(id)).collect())
    }

    async fn list_user_ids_by_post(
        &self,
        post_id: Snowflake,
        kind: ReactionKind,
        limit: i64,
    ) -> RepoResult<Vec<Snowflake>> {
        let post_id = post_id.into_inner();
        let limit = limit.clamp(1, 100) as usize;

        let mut hits: Vec<(i64, DateTime<Utc>)> = self
            .reactions
            .iter()
            .filter(|entry| entry.key().1 == post_id && entry.key().2 == kind)
            .map(|entry| (entry.key().0, *entry.value()))
            .collect();

        hits.sort_by(|a, b| b.1.cmp(&a.1));
        hits.truncate(limit);

        Ok(hits.into_iter().map(|(id, _)| Snowflake::new(id)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn reaction(user: i64, post: i64, kind: ReactionKind) -> Reaction {
        Reaction::new(Snowflake::new(user), Snowflake::new(post), kind)
    }

    #[tokio::test]
    async fn test_insert_and_exists() {
        let repo = MemReactionRepository::new();
        let r = reaction(1, 100, ReactionKind::Like);

        assert!(!repo
            .exists(r.user_id, r.post_id, ReactionKind::Like)
            .await
            .unwrap());

        repo.insert(&r).await.unwrap();

        assert!(repo
            .exists(r.user_id, r.post_id, ReactionKind::Like)
            .await
            .unwrap());
        assert!(!repo
            .exists(r.user_id, r.post_id, ReactionKind::Dislike)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_insert_conflicts() {
        let repo = MemReactionRepository::new();
        let r = reaction(1, 100, ReactionKind::Like);

        repo.insert(&r).await.unwrap();
        let result = repo.insert(&r).await;
        assert!(matches!(result, Err(DomainError::ReactionAlreadyExists)));
    }

    #[tokio::test]
    async fn test_delete_missing_reports_not_found() {
        let repo = MemReactionRepository::new();

        let result = repo
            .delete(Snowflake::new(1), Snowflake::new(100), ReactionKind::Like)
            .await;
        assert!(matches!(result, Err(DomainError::ReactionNotFound)));
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let repo = MemReactionRepository::new();
        let r = reaction(1, 100, ReactionKind::Dislike);

        repo.insert(&r).await.unwrap();
        repo.delete(r.user_id, r.post_id, ReactionKind::Dislike)
            .await
            .unwrap();

        assert!(!repo
            .exists(r.user_id, r.post_id, ReactionKind::Dislike)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_count_for_post() {
        let repo = MemReactionRepository::new();
        repo.insert(&reaction(1, 100, ReactionKind::Like)).await.unwrap();
        repo.insert(&reaction(2, 100, ReactionKind::Like)).await.unwrap();
        repo.insert(&reaction(3, 100, ReactionKind::Dislike)).await.unwrap();
        repo.insert(&reaction(1, 200, ReactionKind::Like)).await.unwrap();

        let post = Snowflake::new(100);
        assert_eq!(repo.count_for_post(post, ReactionKind::Like).await.unwrap(), 2);
        assert_eq!(repo.count_for_post(post, ReactionKind::Dislike).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_post_ids_newest_first() {
        let repo = MemReactionRepository::new();
        let user = Snowflake::new(1);
        let base = Utc::now();

        for (i, post) in [100, 200, 300].iter().enumerate() {
            let mut r = reaction(1, *post, ReactionKind::Like);
            r.created_at = base + Duration::seconds(i as i64);
            repo.insert(&r).await.unwrap();
        }

        let posts = repo
            .list_post_ids_by_user(user, ReactionKind::Like, 10)
            .await
            .unwrap();
        let ids: Vec<i64> = posts.into_iter().map(Snowflake::into_inner).collect();
        assert_eq!(ids, vec![300, 200, 100]);
    }

    #[tokio::test]
    async fn test_list_respects_limit() {
        let repo = MemReactionRepository::new();
        for user in 1..=5 {
            repo.insert(&reaction(user, 100, ReactionKind::Like))
                .await
                .unwrap();
        }

        let users = repo
            .list_user_ids_by_post(Snowflake::new(100), ReactionKind::Like, 3)
            .await
            .unwrap();
        assert_eq!(users.len(), 3);
    }
}
