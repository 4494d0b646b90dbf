// Proxy service - Translates inbound browser requests into upstream calls
use crate::application::upstream_gateway::{ProxyError, UpstreamGateway, UpstreamRequest};
use crate::domain::filters::{encode_query, with_query};
use axum::http::Method;
use bytes::Bytes;
use serde_json::Value;
use std::sync::Arc;

pub const DASHBOARD_RESOURCE: &str = "/api/Statistics/dashboard";

#[derive(Debug, Clone)]
pub struct ProxyTarget {
    pub base_url: String,
    pub placeholder_authorization: String,
}

/// Inbound request as seen by the generic passthrough route
#[derive(Debug, Clone)]
pub struct PassthroughRequest {
    pub method: Method,
    pub path: String,
    pub raw_query: Option<String>,
    pub authorization: Option<String>,
    pub body: Bytes,
}

#[derive(Clone)]
pub struct ProxyService {
    gateway: Arc<dyn UpstreamGateway>,
    target: ProxyTarget,
}

impl ProxyService {
    pub fn new(gateway: Arc<dyn UpstreamGateway>, target: ProxyTarget) -> Self {
        let target = ProxyTarget {
            base_url: target.base_url.trim_end_matches('/').to_string(),
            ..target
        };
        Self { gateway, target }
    }

    pub fn target_url(&self, resource_path: &str, query: &str) -> String {
        with_query(&format!("{}{}", self.target.base_url, resource_path), query)
    }

    /// Forward to the statistics dashboard resource. Query parameters are
    /// re-encoded in their inbound order; no credentials are passed along.
    pub async fn forward_dashboard(&self, query: &[(String, String)]) -> Result<Value, ProxyError> {
        let url = self.target_url(DASHBOARD_RESOURCE, &encode_query(query.iter().map(|(k, v)| (k, v))));
        tracing::info!(%url, "Forwarding dashboard request");

        let result = self
            .gateway
            .send(UpstreamRequest {
                method: Method::GET,
                url,
                authorization: None,
                body: None,
            })
            .await;

        log_outcome(&result);
        result
    }

    /// Forward any method to `/api/{path}`, keeping the raw query string
    pub async fn forward_passthrough(&self, request: PassthroughRequest) -> Result<Value, ProxyError> {
        let resource = format!("/api/{}", request.path.trim_start_matches('/'));
        let url = self.target_url(&resource, request.raw_query.as_deref().unwrap_or(""));
        tracing::info!(method = %request.method, %url, "Forwarding passthrough request");

        let authorization = request
            .authorization
            .unwrap_or_else(|| self.target.placeholder_authorization.clone());

        let body = if request.method == Method::GET {
            None
        } else {
            json_body(&request.body)
        };

        let result = self
            .gateway
            .send(UpstreamRequest {
                method: request.method,
                url,
                authorization: Some(authorization),
                body,
            })
            .await;

        log_outcome(&result);
        result
    }
}

/// Inbound body as JSON. Non-JSON text is forwarded as a JSON string and an
/// empty body is not forwarded at all.
fn json_body(raw: &Bytes) -> Option<Value> {
    if raw.is_empty() {
        return None;
    }
    match serde_json::from_slice(raw) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(String::from_utf8_lossy(raw).into_owned())),
    }
}

fn log_outcome(result: &Result<Value, ProxyError>) {
    match result {
        Ok(_) => tracing::info!("Upstream data received"),
        Err(e) => tracing::error!(error = %e, "Upstream call failed"),
    }
}
