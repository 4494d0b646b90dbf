// HTTP response utilities for the proxy routes
use crate::application::upstream_gateway::ProxyError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ERROR_TITLE: &str = "Erro ao conectar com a API";

/// Body of every failed proxy call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub tip: String,
}

impl ErrorEnvelope {
    pub fn from_proxy_error(err: &ProxyError, tip: &str) -> Self {
        Self {
            error: ERROR_TITLE.to_string(),
            details: err.to_string(),
            tip: tip.to_string(),
        }
    }
}

impl IntoResponse for ErrorEnvelope {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

/// Relay an upstream result: data as 200, any failure as a 500 envelope
pub fn relay(result: Result<Value, ProxyError>, tip: &str) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        Err(e) => ErrorEnvelope::from_proxy_error(&e, tip).into_response(),
    }
}
