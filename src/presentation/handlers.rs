// HTTP request handlers
use crate::application::proxy_service::PassthroughRequest;
use crate::infrastructure::http_response::relay;
use crate::presentation::app_state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, Query, RawQuery, State},
    http::{header, HeaderMap, Method},
    response::Response,
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Proxy to the statistics dashboard resource
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    let result = state.proxy_service.forward_dashboard(&query).await;
    relay(result, &state.dashboard_tip)
}

/// Generic passthrough to `/api/{path}`
pub async fn passthrough(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    RawQuery(raw_query): RawQuery,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let request = PassthroughRequest {
        method,
        path,
        raw_query,
        authorization,
        body,
    };
    let result = state.proxy_service.forward_passthrough(request).await;
    relay(result, &state.passthrough_tip)
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/api/dashboard", get(dashboard))
        .route("/api/proxy/*path", any(passthrough))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(state)
}
