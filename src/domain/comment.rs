use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::RETENTION_SECS;

/// Upper bound on comment content, counted in characters.
pub const MAX_CONTENT_LENGTH: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub comment_id: Uuid,
    pub topic_id: String,
    pub session_id: String,
    pub content: String,
    pub anonymous_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Epoch seconds; read by the store's TTL sweep, never by the service.
    pub expires_at: i64,
    pub likes: i64,
    pub is_deleted: bool,
}

impl Comment {
    pub fn new(
        topic_id: String,
        session_id: String,
        content: String,
        anonymous_name: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            comment_id: Uuid::new_v4(),
            topic_id,
            session_id,
            content,
            anonymous_name,
            created_at: now,
            updated_at: now,
            expires_at: now.timestamp() + RETENTION_SECS,
            likes: 0,
            is_deleted: false,
        }
    }

    pub fn is_authored_by(&self, session_id: &str) -> bool {
        self.session_id == session_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_creation() {
        let comment = Comment::new(
            "knee-pain".to_string(),
            "s1".to_string(),
            "hello".to_string(),
            "Anon".to_string(),
        );

        assert_eq!(comment.topic_id, "knee-pain");
        assert_eq!(comment.session_id, "s1");
        assert_eq!(comment.content, "hello");
        assert_eq!(comment.anonymous_name, "Anon");
        assert_eq!(comment.likes, 0);
        assert!(!comment.is_deleted);
        assert_eq!(comment.created_at, comment.updated_at);
        assert_eq!(
            comment.expires_at - comment.created_at.timestamp(),
            2_592_000
        );
    }

    #[test]
    fn test_comment_ids_are_unique() {
        let a = Comment::new("t".into(), "s".into(), "a".into(), "n".into());
        let b = Comment::new("t".into(), "s".into(), "b".into(), "n".into());

        assert_ne!(a.comment_id, b.comment_id);
    }

    #[test]
    fn test_is_authored_by() {
        let comment = Comment::new("t".into(), "s1".into(), "c".into(), "n".into());

        assert!(comment.is_authored_by("s1"));
        assert!(!comment.is_authored_by("s2"));
        assert!(!comment.is_authored_by(""));
    }

    #[test]
    fn test_serializes_with_camel_case_fields() {
        let comment = Comment::new("t".into(), "s1".into(), "c".into(), "n".into());
        let value = serde_json::to_value(&comment).unwrap();

        assert_eq!(value["commentId"], comment.comment_id.to_string());
        assert_eq!(value["topicId"], "t");
        assert_eq!(value["anonymousName"], "n");
        assert_eq!(value["isDeleted"], false);
        assert_eq!(value["likes"], 0);
        assert!(value["expiresAt"].is_i64());
        assert!(value["createdAt"].is_string());
    }
}
