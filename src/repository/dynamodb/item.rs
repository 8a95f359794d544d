//! Conversion between domain records and DynamoDB attribute maps.
//!
//! DynamoDB hands numbers back as decimal strings (`N`). Integral attributes
//! go through [`decimal_to_integer`], which also accepts integral values
//! written in decimal or exponent form.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use uuid::Uuid;

use crate::domain::comment::Comment;
use crate::domain::session::Session;
use crate::repository::errors::RepositoryError;

pub type Item = HashMap<String, AttributeValue>;

pub fn comment_to_item(comment: &Comment) -> Item {
    HashMap::from([
        (
            "commentId".to_string(),
            AttributeValue::S(comment.comment_id.to_string()),
        ),
        ("topicId".to_string(), AttributeValue::S(comment.topic_id.clone())),
        (
            "sessionId".to_string(),
            AttributeValue::S(comment.session_id.clone()),
        ),
        ("content".to_string(), AttributeValue::S(comment.content.clone())),
        (
            "anonymousName".to_string(),
            AttributeValue::S(comment.anonymous_name.clone()),
        ),
        (
            "createdAt".to_string(),
            AttributeValue::S(format_timestamp(comment.created_at)),
        ),
        (
            "updatedAt".to_string(),
            AttributeValue::S(format_timestamp(comment.updated_at)),
        ),
        (
            "expiresAt".to_string(),
            AttributeValue::N(comment.expires_at.to_string()),
        ),
        ("likes".to_string(), AttributeValue::N(comment.likes.to_string())),
        ("isDeleted".to_string(), AttributeValue::Bool(comment.is_deleted)),
    ])
}

pub fn comment_from_item(item: &Item) -> Result<Comment, RepositoryError> {
    Ok(Comment {
        comment_id: get_uuid(item, "commentId")?,
        topic_id: get_string(item, "topicId")?,
        session_id: get_string(item, "sessionId")?,
        content: get_string(item, "content")?,
        anonymous_name: get_string(item, "anonymousName")?,
        created_at: get_timestamp(item, "createdAt")?,
        updated_at: get_timestamp(item, "updatedAt")?,
        expires_at: get_integer(item, "expiresAt")?,
        likes: get_optional_integer(item, "likes")?.unwrap_or(0),
        is_deleted: get_optional_bool(item, "isDeleted")?.unwrap_or(false),
    })
}

pub fn session_to_item(session: &Session) -> Item {
    HashMap::from([
        (
            "sessionId".to_string(),
            AttributeValue::S(session.session_id.to_string()),
        ),
        (
            "createdAt".to_string(),
            AttributeValue::S(format_timestamp(session.created_at)),
        ),
        (
            "expiresAt".to_string(),
            AttributeValue::N(session.expires_at.to_string()),
        ),
    ])
}

pub fn session_from_item(item: &Item) -> Result<Session, RepositoryError> {
    Ok(Session {
        session_id: get_uuid(item, "sessionId")?,
        created_at: get_timestamp(item, "createdAt")?,
        expires_at: get_integer(item, "expiresAt")?,
    })
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Reads a DynamoDB decimal as an integer.
///
/// Values without a fractional part (`"3"`, `"3.0"`, `"3E0"`) are accepted.
/// Returns `None` for fractions, out-of-range values and text that is not a
/// finite number.
pub fn decimal_to_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(integer) = raw.parse::<i64>() {
        return Some(integer);
    }

    let value = raw.parse::<f64>().ok().filter(|v| v.is_finite())?;
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        return Some(value as i64);
    }
    None
}

fn attribute<'a>(item: &'a Item, name: &str) -> Result<&'a AttributeValue, RepositoryError> {
    item.get(name)
        .ok_or_else(|| RepositoryError::Decode(format!("missing attribute {name}")))
}

fn mistyped(name: &str, expected: &str) -> RepositoryError {
    RepositoryError::Decode(format!("attribute {name} is not of type {expected}"))
}

fn get_string(item: &Item, name: &str) -> Result<String, RepositoryError> {
    match attribute(item, name)? {
        AttributeValue::S(value) => Ok(value.clone()),
        _ => Err(mistyped(name, "S")),
    }
}

fn get_uuid(item: &Item, name: &str) -> Result<Uuid, RepositoryError> {
    let raw = get_string(item, name)?;
    Uuid::parse_str(&raw)
        .map_err(|e| RepositoryError::Decode(format!("attribute {name} is not a UUID: {e}")))
}

fn get_timestamp(item: &Item, name: &str) -> Result<DateTime<Utc>, RepositoryError> {
    let raw = get_string(item, name)?;
    parse_timestamp(&raw)
        .map_err(|e| RepositoryError::Decode(format!("attribute {name} is not a timestamp: {e}")))
}

/// Accepts RFC 3339 and offset-less ISO 8601 (`2024-05-01T12:34:56.123456`),
/// reading the latter as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Ok(ts.with_timezone(&Utc)),
        Err(_) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc()),
    }
}

fn integer_from(name: &str, value: &AttributeValue) -> Result<i64, RepositoryError> {
    match value {
        AttributeValue::N(raw) => decimal_to_integer(raw)
            .ok_or_else(|| RepositoryError::Decode(format!("attribute {name} is not an integer"))),
        _ => Err(mistyped(name, "N")),
    }
}

fn get_integer(item: &Item, name: &str) -> Result<i64, RepositoryError> {
    integer_from(name, attribute(item, name)?)
}

fn get_optional_integer(item: &Item, name: &str) -> Result<Option<i64>, RepositoryError> {
    item.get(name)
        .map(|value| integer_from(name, value))
        .transpose()
}

fn get_optional_bool(item: &Item, name: &str) -> Result<Option<bool>, RepositoryError> {
    match item.get(name) {
        None => Ok(None),
        Some(AttributeValue::Bool(value)) => Ok(Some(*value)),
        Some(_) => Err(mistyped(name, "BOOL")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_comment() -> Comment {
        Comment::new(
            "knee-pain".to_string(),
            "s1".to_string(),
            "hello".to_string(),
            "Anon".to_string(),
        )
    }

    #[test]
    fn test_comment_item_keeps_every_field() {
        let comment = sample_comment();
        let item = comment_to_item(&comment);

        assert_eq!(item.len(), 10);
        assert_eq!(
            item.get("commentId"),
            Some(&AttributeValue::S(comment.comment_id.to_string()))
        );
        assert_eq!(item.get("isDeleted"), Some(&AttributeValue::Bool(false)));
        assert_eq!(item.get("likes"), Some(&AttributeValue::N("0".to_string())));

        let decoded = comment_from_item(&item).unwrap();
        assert_eq!(decoded, comment);
    }

    #[test]
    fn test_decimal_to_integer() {
        assert_eq!(decimal_to_integer("0"), Some(0));
        assert_eq!(decimal_to_integer("1767225600"), Some(1_767_225_600));
        assert_eq!(decimal_to_integer("3.0"), Some(3));
        assert_eq!(decimal_to_integer("1E2"), Some(100));
        assert_eq!(decimal_to_integer("-7"), Some(-7));
    }

    #[test]
    fn test_decimal_to_integer_rejects_fractions_and_garbage() {
        assert!(decimal_to_integer("1.5").is_none());
        assert!(decimal_to_integer("abc").is_none());
        assert!(decimal_to_integer("").is_none());
        assert!(decimal_to_integer("NaN").is_none());
    }

    #[test]
    fn test_fractional_likes_are_a_decode_error() {
        let mut item = comment_to_item(&sample_comment());
        item.insert("likes".to_string(), AttributeValue::N("1.5".to_string()));

        let err = comment_from_item(&item).unwrap_err();
        assert!(err.to_string().contains("likes"));
    }

    #[test]
    fn test_offset_less_timestamps_are_read_as_utc() {
        let mut item = comment_to_item(&sample_comment());
        item.insert(
            "createdAt".to_string(),
            AttributeValue::S("2024-05-01T12:34:56.123456".to_string()),
        );
        item.insert(
            "updatedAt".to_string(),
            AttributeValue::S("2024-05-01T12:34:56".to_string()),
        );

        let decoded = comment_from_item(&item).unwrap();
        assert_eq!(
            format_timestamp(decoded.created_at),
            "2024-05-01T12:34:56.123456Z"
        );
        assert_eq!(format_timestamp(decoded.updated_at), "2024-05-01T12:34:56Z");
    }

    #[test]
    fn test_unparseable_timestamp_is_a_decode_error() {
        let mut item = comment_to_item(&sample_comment());
        item.insert("createdAt".to_string(), AttributeValue::S("yesterday".to_string()));

        let err = comment_from_item(&item).unwrap_err();
        assert!(err.to_string().contains("createdAt"));
    }

    #[test]
    fn test_decimal_likes_are_read_as_integers() {
        let mut item = comment_to_item(&sample_comment());
        item.insert("likes".to_string(), AttributeValue::N("4.0".to_string()));

        let decoded = comment_from_item(&item).unwrap();
        assert_eq!(decoded.likes, 4);
    }

    #[test]
    fn test_absent_flags_fall_back_to_defaults() {
        let mut item = comment_to_item(&sample_comment());
        item.remove("isDeleted");
        item.remove("likes");

        let decoded = comment_from_item(&item).unwrap();
        assert!(!decoded.is_deleted);
        assert_eq!(decoded.likes, 0);
    }

    #[test]
    fn test_missing_required_attribute_is_a_decode_error() {
        let mut item = comment_to_item(&sample_comment());
        item.remove("sessionId");

        let err = comment_from_item(&item).unwrap_err();
        assert!(matches!(err, RepositoryError::Decode(_)));
        assert!(err.to_string().contains("sessionId"));
    }

    #[test]
    fn test_mistyped_attribute_is_a_decode_error() {
        let mut item = comment_to_item(&sample_comment());
        item.insert("isDeleted".to_string(), AttributeValue::S("false".to_string()));

        let err = comment_from_item(&item).unwrap_err();
        assert!(err.to_string().contains("isDeleted"));
    }

    #[test]
    fn test_session_item() {
        let session = Session::new();
        let item = session_to_item(&session);

        assert_eq!(session_from_item(&item).unwrap(), session);
    }
}
