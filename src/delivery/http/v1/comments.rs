use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::domain::comment::{Comment, MAX_CONTENT_LENGTH};
use crate::delivery::http::v1::invalid_method_or_path;
use crate::usecase::error::UsecaseError;
use crate::AppState;

const CONTENT_TOO_LONG: &str = "Comment content too long";
const INVALID_JSON: &str = "Invalid JSON in request body";

// Fields are optional so that a missing one can be reported by name instead
// of failing deserialization as a whole.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub topic_id: Option<String>,
    pub session_id: Option<String>,
    #[validate(length(max = MAX_CONTENT_LENGTH))]
    pub content: Option<String>,
    pub anonymous_name: Option<String>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentRequest {
    pub session_id: Option<String>,
    #[validate(length(max = MAX_CONTENT_LENGTH))]
    pub content: Option<String>,
}

#[derive(Serialize)]
pub struct DeleteCommentResponse {
    pub message: &'static str,
    pub comment: Comment,
}

// Only a JSON object is a valid body. Derived struct deserialization would
// also accept an array and fill the fields positionally.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, UsecaseError> {
    let malformed = |e: serde_json::Error| {
        tracing::warn!(error = %e, "malformed request body");
        UsecaseError::Validation(INVALID_JSON.to_string())
    };

    let value: Value = serde_json::from_slice(body).map_err(malformed)?;
    if !value.is_object() {
        tracing::warn!("request body is not a JSON object");
        return Err(UsecaseError::Validation(INVALID_JSON.to_string()));
    }
    serde_json::from_value(value).map_err(malformed)
}

/// Query parameters as a plain map. A repeated key keeps its last value.
fn query_params(
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<HashMap<String, String>, UsecaseError> {
    query.map(|Query(params)| params).map_err(|rejection| {
        tracing::warn!(error = %rejection, "malformed query string");
        invalid_method_or_path()
    })
}

fn path_param(path: Result<Path<String>, PathRejection>) -> Result<String, UsecaseError> {
    path.map(|Path(param)| param).map_err(|rejection| {
        tracing::warn!(error = %rejection, "malformed path parameter");
        invalid_method_or_path()
    })
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, UsecaseError> {
    value
        .as_deref()
        .ok_or_else(|| UsecaseError::Validation(format!("Missing required field: {field}")))
}

fn check_length<T: Validate>(payload: &T) -> Result<(), UsecaseError> {
    payload.validate().map_err(|validation_errors| {
        tracing::warn!(?validation_errors, "validation failed");
        UsecaseError::Validation(CONTENT_TOO_LONG.to_string())
    })
}

#[tracing::instrument(skip(state, body))]
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling create comment request");

    if body.is_empty() {
        return Err(UsecaseError::Validation("Missing request body".to_string()));
    }
    let payload: CreateCommentRequest = parse_body(&body)?;

    let topic_id = required(&payload.topic_id, "topicId")?;
    let session_id = required(&payload.session_id, "sessionId")?;
    let content = required(&payload.content, "content")?;
    let anonymous_name = required(&payload.anonymous_name, "anonymousName")?;
    check_length(&payload)?;

    let comment = state
        .comments_usecase
        .create_comment(
            topic_id.to_string(),
            session_id.to_string(),
            content.to_string(),
            anonymous_name.to_string(),
        )
        .await?;

    metrics::counter!("comments_created_total").increment(1);
    tracing::debug!(comment_id = %comment.comment_id, "comment created successfully");
    Ok((StatusCode::OK, Json(comment)))
}

#[tracing::instrument(skip(state, query))]
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling list comments request");

    let topic_id = query_params(query)?
        .remove("topicId")
        .ok_or_else(|| UsecaseError::Validation("Missing topicId parameter".to_string()))?;

    let comments = state.comments_usecase.list_comments(&topic_id).await?;

    tracing::debug!(topic_id = %topic_id, count = comments.len(), "comments listed successfully");
    Ok((StatusCode::OK, Json(comments)))
}

#[tracing::instrument(skip(state, comment_id, body))]
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    comment_id: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<impl IntoResponse, UsecaseError> {
    let comment_id = path_param(comment_id)?;
    tracing::debug!(comment_id = %comment_id, "handling update comment request");

    if body.is_empty() || comment_id.is_empty() {
        return Err(UsecaseError::Validation(
            "Missing request body or commentId".to_string(),
        ));
    }
    let payload: UpdateCommentRequest = parse_body(&body)?;

    let session_id = payload
        .session_id
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| UsecaseError::Validation("Missing commentId or sessionId".to_string()))?;
    let content = payload
        .content
        .as_deref()
        .ok_or_else(|| UsecaseError::Validation("Missing content field".to_string()))?;
    check_length(&payload)?;

    let comment = state
        .comments_usecase
        .update_comment(&comment_id, session_id, content.to_string())
        .await?;

    metrics::counter!("comments_updated_total").increment(1);
    tracing::debug!(comment_id = %comment.comment_id, "comment updated successfully");
    Ok((StatusCode::OK, Json(comment)))
}

#[tracing::instrument(skip(state, comment_id, query))]
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    comment_id: Result<Path<String>, PathRejection>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<impl IntoResponse, UsecaseError> {
    let comment_id = path_param(comment_id)?;
    tracing::debug!(comment_id = %comment_id, "handling delete comment request");

    if comment_id.is_empty() {
        return Err(UsecaseError::Validation(
            "Missing commentId parameter".to_string(),
        ));
    }
    let session_id = query_params(query)?
        .remove("sessionId")
        .filter(|s| !s.is_empty())
        .ok_or_else(|| UsecaseError::Validation("Missing sessionId parameter".to_string()))?;

    let comment = state
        .comments_usecase
        .delete_comment(&comment_id, &session_id)
        .await?;

    metrics::counter!("comments_deleted_total").increment(1);
    tracing::debug!(comment_id = %comment.comment_id, "comment deleted successfully");
    Ok((
        StatusCode::OK,
        Json(DeleteCommentResponse {
            message: "Comment deleted successfully",
            comment,
        }),
    ))
}

/// `PUT /comments/` with no id segment.
pub async fn update_without_id() -> UsecaseError {
    UsecaseError::Validation("Missing request body or commentId".to_string())
}

/// `DELETE /comments/` with no id segment.
pub async fn delete_without_id() -> UsecaseError {
    UsecaseError::Validation("Missing commentId parameter".to_string())
}
