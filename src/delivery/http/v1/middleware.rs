use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::AppState;

/// Answers preflight requests directly and stamps the CORS header block on
/// everything else on the way out.
pub async fn cors_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request.headers().get(header::ORIGIN).cloned();

    let mut response = if request.method() == Method::OPTIONS {
        tracing::debug!(?origin, path = %request.uri().path(), "answering preflight");
        (
            StatusCode::OK,
            Json(json!({ "message": "CORS preflight passed" })),
        )
            .into_response()
    } else {
        next.run(request).await
    };

    state.cors.apply(origin.as_ref(), response.headers_mut());
    response
}
