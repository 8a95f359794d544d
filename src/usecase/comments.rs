use chrono::Utc;

use crate::domain::comment::Comment;
use crate::domain::parse_record_id;
use crate::repository::errors::RepositoryError;
use crate::usecase::contracts::CommentRepository;
use crate::usecase::error::UsecaseError;

pub struct CommentsUseCase<C>
where
    C: CommentRepository,
{
    comment_repository: C,
}

impl<C> CommentsUseCase<C>
where
    C: CommentRepository,
{
    pub fn new(comment_repository: C) -> Self {
        Self { comment_repository }
    }

    #[tracing::instrument(skip(self, session_id, content, anonymous_name), fields(topic_id = %topic_id))]
    pub async fn create_comment(
        &self,
        topic_id: String,
        session_id: String,
        content: String,
        anonymous_name: String,
    ) -> Result<Comment, UsecaseError> {
        tracing::debug!("creating comment");

        let comment = Comment::new(topic_id, session_id, content, anonymous_name);
        self.comment_repository.create(&comment).await?;

        tracing::info!(comment_id = %comment.comment_id, topic_id = %comment.topic_id, "comment created successfully");
        Ok(comment)
    }

    #[tracing::instrument(skip(self), fields(topic_id = %topic_id))]
    pub async fn list_comments(&self, topic_id: &str) -> Result<Vec<Comment>, UsecaseError> {
        tracing::debug!("listing comments for topic");

        let comments = self
            .comment_repository
            .find_active_by_topic_id(topic_id)
            .await?;

        tracing::debug!(topic_id = %topic_id, count = comments.len(), "retrieved comments");
        Ok(comments)
    }

    #[tracing::instrument(skip(self, session_id, content), fields(comment_id = %comment_id))]
    pub async fn update_comment(
        &self,
        comment_id: &str,
        session_id: &str,
        content: String,
    ) -> Result<Comment, UsecaseError> {
        tracing::debug!("updating comment");

        let comment = self.find_authored(comment_id, session_id).await?;
        if comment.is_deleted {
            return Err(UsecaseError::Conflict(
                "Cannot update deleted comment".to_string(),
            ));
        }

        let updated = self
            .comment_repository
            .update_content(comment.comment_id, &comment.topic_id, &content, Utc::now())
            .await
            .map_err(comment_not_found)?;

        tracing::info!(comment_id = %updated.comment_id, "comment updated successfully");
        Ok(updated)
    }

    #[tracing::instrument(skip(self, session_id), fields(comment_id = %comment_id))]
    pub async fn delete_comment(
        &self,
        comment_id: &str,
        session_id: &str,
    ) -> Result<Comment, UsecaseError> {
        tracing::debug!("deleting comment");

        let comment = self.find_authored(comment_id, session_id).await?;
        if comment.is_deleted {
            return Err(UsecaseError::Conflict("Comment already deleted".to_string()));
        }

        let deleted = self
            .comment_repository
            .mark_deleted(comment.comment_id, &comment.topic_id, Utc::now())
            .await
            .map_err(comment_not_found)?;

        tracing::info!(comment_id = %deleted.comment_id, "comment deleted successfully");
        Ok(deleted)
    }

    /// Looks the comment up by id alone and checks that `session_id` wrote it.
    async fn find_authored(
        &self,
        comment_id: &str,
        session_id: &str,
    ) -> Result<Comment, UsecaseError> {
        // Ids are always generated as UUIDs, so anything else cannot exist.
        let Some(id) = parse_record_id(comment_id) else {
            return Err(UsecaseError::NotFound("Comment".to_string()));
        };

        let comment = self
            .comment_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("Comment".to_string()))?;

        if !comment.is_authored_by(session_id) {
            tracing::warn!(comment_id = %id, "session does not own comment");
            return Err(UsecaseError::Forbidden("Unauthorized".to_string()));
        }

        Ok(comment)
    }
}

fn comment_not_found(e: RepositoryError) -> UsecaseError {
    match e {
        RepositoryError::NotFound => UsecaseError::NotFound("Comment".to_string()),
        other => other.into(),
    }
}
