pub mod item;

use aws_sdk_dynamodb::{
    error::DisplayErrorContext,
    types::{AttributeValue, ReturnValue},
    Client,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    domain::comment::Comment,
    domain::session::Session,
    repository::errors::RepositoryError,
    usecase::contracts::{CommentRepository, SessionRepository},
};
use item::{comment_from_item, comment_to_item, format_timestamp, session_from_item, session_to_item, Item};

fn store_error<E>(err: E) -> RepositoryError
where
    E: std::error::Error + 'static,
{
    RepositoryError::Store(DisplayErrorContext(&err).to_string())
}

pub struct DynamoCommentRepository {
    client: Client,
    table_name: String,
}

impl DynamoCommentRepository {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }

    /// Runs a filtered scan over the whole table, following the pagination
    /// cursor until the store reports no more pages.
    async fn scan_all(
        &self,
        filter_expression: &str,
        values: &[(&str, AttributeValue)],
    ) -> Result<Vec<Comment>, RepositoryError> {
        let mut comments = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let mut request = self
                .client
                .scan()
                .table_name(&self.table_name)
                .filter_expression(filter_expression)
                .set_exclusive_start_key(start_key.take());
            for (name, value) in values {
                request = request.expression_attribute_values(*name, value.clone());
            }

            let output = request.send().await.map_err(store_error)?;
            for item in output.items() {
                comments.push(comment_from_item(item)?);
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(comments)
    }

    /// Applies `SET` assignments to an existing item and returns the new image.
    async fn update_existing(
        &self,
        comment_id: Uuid,
        topic_id: &str,
        update_expression: &str,
        values: Vec<(&str, AttributeValue)>,
    ) -> Result<Comment, RepositoryError> {
        let mut request = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key("commentId", AttributeValue::S(comment_id.to_string()))
            .key("topicId", AttributeValue::S(topic_id.to_string()))
            .update_expression(update_expression)
            .condition_expression("attribute_exists(commentId)")
            .return_values(ReturnValue::AllNew);
        for (name, value) in values {
            request = request.expression_attribute_values(name, value);
        }

        let output = request.send().await.map_err(|e| {
            let vanished = e
                .as_service_error()
                .is_some_and(|se| se.is_conditional_check_failed_exception());
            if vanished {
                RepositoryError::NotFound
            } else {
                store_error(e)
            }
        })?;

        let attributes = output
            .attributes()
            .ok_or_else(|| RepositoryError::Decode("update returned no attributes".to_string()))?;
        comment_from_item(attributes)
    }
}

impl CommentRepository for DynamoCommentRepository {
    #[tracing::instrument(skip(self, comment), fields(comment_id = %comment.comment_id, topic_id = %comment.topic_id))]
    async fn create(&self, comment: &Comment) -> Result<(), RepositoryError> {
        tracing::debug!("creating comment");

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(comment_to_item(comment)))
            .send()
            .await
            .map_err(store_error)?;

        tracing::debug!(comment_id = %comment.comment_id, "comment created successfully");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(topic_id = %topic_id))]
    async fn find_active_by_topic_id(&self, topic_id: &str) -> Result<Vec<Comment>, RepositoryError> {
        tracing::debug!("finding active comments by topic_id");

        let comments = self
            .scan_all(
                "topicId = :topicId AND isDeleted = :isDeleted",
                &[
                    (":topicId", AttributeValue::S(topic_id.to_string())),
                    (":isDeleted", AttributeValue::Bool(false)),
                ],
            )
            .await?;

        tracing::debug!(topic_id = %topic_id, count = comments.len(), "found comments");
        Ok(comments)
    }

    #[tracing::instrument(skip(self), fields(comment_id = %comment_id))]
    async fn find_by_id(&self, comment_id: Uuid) -> Result<Option<Comment>, RepositoryError> {
        tracing::debug!("finding comment by id");

        // The table key is (commentId, topicId) and callers only know the
        // first half, so this is a scan rather than a point read.
        let comment = self
            .scan_all(
                "commentId = :commentId",
                &[(":commentId", AttributeValue::S(comment_id.to_string()))],
            )
            .await?
            .into_iter()
            .next();

        Ok(comment)
    }

    #[tracing::instrument(skip(self, content), fields(comment_id = %comment_id, topic_id = %topic_id))]
    async fn update_content(
        &self,
        comment_id: Uuid,
        topic_id: &str,
        content: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Comment, RepositoryError> {
        tracing::debug!("updating comment content");

        let comment = self
            .update_existing(
                comment_id,
                topic_id,
                "SET content = :content, updatedAt = :updatedAt",
                vec![
                    (":content", AttributeValue::S(content.to_string())),
                    (":updatedAt", AttributeValue::S(format_timestamp(updated_at))),
                ],
            )
            .await?;

        tracing::debug!(comment_id = %comment_id, "comment content updated successfully");
        Ok(comment)
    }

    #[tracing::instrument(skip(self), fields(comment_id = %comment_id, topic_id = %topic_id))]
    async fn mark_deleted(
        &self,
        comment_id: Uuid,
        topic_id: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<Comment, RepositoryError> {
        tracing::debug!("soft deleting comment");

        let comment = self
            .update_existing(
                comment_id,
                topic_id,
                "SET isDeleted = :isDeleted, updatedAt = :updatedAt",
                vec![
                    (":isDeleted", AttributeValue::Bool(true)),
                    (":updatedAt", AttributeValue::S(format_timestamp(updated_at))),
                ],
            )
            .await?;

        tracing::debug!(comment_id = %comment_id, "comment soft deleted successfully");
        Ok(comment)
    }
}

pub struct DynamoSessionRepository {
    client: Client,
    table_name: String,
}

impl DynamoSessionRepository {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }
}

impl SessionRepository for DynamoSessionRepository {
    #[tracing::instrument(skip(self, session), fields(session_id = %session.session_id))]
    async fn create(&self, session: &Session) -> Result<(), RepositoryError> {
        tracing::debug!("creating session");

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(session_to_item(session)))
            .send()
            .await
            .map_err(store_error)?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(session_id = %session_id))]
    async fn find_by_id(&self, session_id: Uuid) -> Result<Option<Session>, RepositoryError> {
        tracing::debug!("finding session by id");

        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("sessionId", AttributeValue::S(session_id.to_string()))
            .send()
            .await
            .map_err(store_error)?;

        output.item().map(session_from_item).transpose()
    }
}
