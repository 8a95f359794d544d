use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::delivery::http::v1::invalid_method_or_path;
use crate::usecase::error::UsecaseError;
use crate::AppState;

#[tracing::instrument(skip(state))]
pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling create session request");

    let session = state.sessions_usecase.create_session().await?;

    metrics::counter!("sessions_created_total").increment(1);
    Ok((StatusCode::OK, Json(session)))
}

#[tracing::instrument(skip(state, session_id))]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    session_id: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, UsecaseError> {
    let Path(session_id) = session_id.map_err(|rejection| {
        tracing::warn!(error = %rejection, "malformed path parameter");
        invalid_method_or_path()
    })?;
    tracing::debug!(session_id = %session_id, "handling get session request");

    let session = state.sessions_usecase.get_session(&session_id).await?;

    Ok((StatusCode::OK, Json(session)))
}
