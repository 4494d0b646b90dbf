// Gateway trait for calls to the upstream REST API
use async_trait::async_trait;
use axum::http::Method;
use serde_json::Value;
use thiserror::Error;

/// Everything the forwarder decided to send upstream
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

/// Failure reaching or reading the upstream API.
///
/// All variants end up in the same error envelope; the message is what
/// the caller sees in `details`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProxyError {
    #[error("{0}")]
    Transport(String),

    #[error("API retornou status {status}: {reason}")]
    UpstreamStatus { status: u16, reason: String },

    #[error("{0}")]
    Decode(String),
}

#[async_trait]
pub trait UpstreamGateway: Send + Sync {
    /// Send a request and return the parsed JSON body of a successful response
    async fn send(&self, request: UpstreamRequest) -> Result<Value, ProxyError>;
}
