use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    domain::{comment::Comment, session::Session},
    repository::errors::RepositoryError,
};

#[cfg_attr(test, mockall::automock)]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, comment: &Comment) -> Result<(), RepositoryError>;
    /// Comments on the topic that have not been soft deleted.
    async fn find_active_by_topic_id(&self, topic_id: &str) -> Result<Vec<Comment>, RepositoryError>;
    async fn find_by_id(&self, comment_id: Uuid) -> Result<Option<Comment>, RepositoryError>;
    async fn update_content(
        &self,
        comment_id: Uuid,
        topic_id: &str,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Comment, RepositoryError>;
    async fn mark_deleted(
        &self,
        comment_id: Uuid,
        topic_id: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Comment, RepositoryError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, session_id: Uuid) -> Result<Option<Session>, RepositoryError>;
}
