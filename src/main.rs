mod config;
mod delivery;
mod domain;
mod repository;
mod telemetry;
mod usecase;

use std::sync::Arc;

use anyhow::Context;
use aws_config::retry::RetryConfig;
use axum::{
    extract::State,
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tower_http::trace::TraceLayer;

use crate::delivery::http::v1::comments::{
    create_comment, delete_comment, delete_without_id, list_comments, update_comment,
    update_without_id,
};
use crate::delivery::http::v1::cors::CorsPolicy;
use crate::delivery::http::v1::invalid_request;
use crate::delivery::http::v1::middleware::cors_middleware;
use crate::delivery::http::v1::sessions::{create_session, get_session};
use crate::repository::dynamodb::{DynamoCommentRepository, DynamoSessionRepository};
use crate::usecase::comments::CommentsUseCase;
use crate::usecase::sessions::SessionsUseCase;

pub struct AppState {
    pub comments_usecase: CommentsUseCase<DynamoCommentRepository>,
    pub sessions_usecase: SessionsUseCase<DynamoSessionRepository>,
    pub cors: CorsPolicy,
    pub metrics_handle: PrometheusHandle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::AppConfig::from_env().context("failed to load config")?;

    telemetry::init(&config).map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!("starting the topic comments service");

    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus recorder")?;
    metrics_process::Collector::default().describe();
    tracing::info!("prometheus metrics initialized");

    tracing::info!(
        comments_table = %config.comments_table,
        sessions_table = %config.sessions_table,
        telemetry_enabled = config.telemetry_enabled,
        "config loaded"
    );

    // A failed store call is reported to the caller as-is, never retried.
    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .retry_config(RetryConfig::disabled())
        .load()
        .await;
    let mut dynamodb_config = aws_sdk_dynamodb::config::Builder::from(&aws_config);
    if let Some(endpoint) = &config.dynamodb_endpoint {
        dynamodb_config = dynamodb_config.endpoint_url(endpoint);
    }
    let dynamodb_client = aws_sdk_dynamodb::Client::from_conf(dynamodb_config.build());
    tracing::info!(endpoint = ?config.dynamodb_endpoint, "DynamoDB client configured");

    let comment_repository =
        DynamoCommentRepository::new(dynamodb_client.clone(), config.comments_table.clone());
    let session_repository =
        DynamoSessionRepository::new(dynamodb_client, config.sessions_table.clone());

    let cors = CorsPolicy::new(config.allowed_origins()).context("invalid CORS_ALLOWED_ORIGINS")?;

    let shared_state = Arc::new(AppState {
        comments_usecase: CommentsUseCase::new(comment_repository),
        sessions_usecase: SessionsUseCase::new(session_repository),
        cors,
        metrics_handle,
    });

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!(listen_addr = %config.listen_addr, "topic comments service running");
    axum::serve(listener, app(shared_state)).await?;

    Ok(())
}

fn app(shared_state: Arc<AppState>) -> Router {
    // Unknown paths and unsupported methods both land on `invalid_request`,
    // and everything in here passes through the CORS layer.
    let comments_api = Router::new()
        .route(
            "/sessions",
            post(create_session).fallback(invalid_request),
        )
        .route(
            "/sessions/",
            post(create_session).fallback(invalid_request),
        )
        .route(
            "/sessions/{session_id}",
            get(get_session).fallback(invalid_request),
        )
        .route(
            "/comments",
            get(list_comments)
                .post(create_comment)
                .fallback(invalid_request),
        )
        .route(
            "/comments/",
            get(list_comments)
                .post(create_comment)
                .put(update_without_id)
                .delete(delete_without_id)
                .fallback(invalid_request),
        )
        .route(
            "/comments/{comment_id}",
            put(update_comment)
                .delete(delete_comment)
                .fallback(invalid_request),
        )
        .fallback(invalid_request)
        .layer(middleware::from_fn_with_state(
            shared_state.clone(),
            cors_middleware,
        ));

    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .merge(comments_api)
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state)
}

async fn metrics(State(state): State<Arc<AppState>>) -> String {
    metrics_process::Collector::default().collect();
    state.metrics_handle.render()
}

#[tracing::instrument]
async fn healthz() -> &'static str {
    "OK"
}
