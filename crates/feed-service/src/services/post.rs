//! Post service - post creation and retrieval

use feed_core::{DomainError, Post, Snowflake, MAX_CONTENT_LENGTH};
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use crate::dto::requests::CreatePostRequest;
use crate::dto::responses::PostResponse;

/// Service for post operations
pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a post authored by the authenticated user
    #[instrument(skip(self, request))]
    pub async fn create_post(
        &self,
        author_id: Snowflake,
        request: CreatePostRequest,
    ) -> ServiceResult<PostResponse> {
        let content = request.content;
        if content.is_empty() {
            return Err(ServiceError::validation("Post content cannot be empty"));
        }
        if !Post::content_valid(&content) {
            return Err(DomainError::ContentTooLong {
                max: MAX_CONTENT_LENGTH,
            }
            .into());
        }

        let post = Post::new(self.ctx.generate_id(), author_id, content);
        self.ctx.post_repo().create(&post).await?;

        info!(post_id = %post.id, author_id = %author_id, "Post created");

        Ok(PostResponse::from(&post))
    }

    /// Fetch a post with its current reaction counters
    #[instrument(skip(self))]
    pub async fn get_post(&self, post_id: Snowflake) -> ServiceResult<PostResponse> {
        let post = self
            .ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post", post_id.to_string()))?;

        Ok(PostResponse::from(&post))
    }
}
