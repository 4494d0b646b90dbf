// reqwest-backed gateway to the upstream REST API
use crate::application::upstream_gateway::{ProxyError, UpstreamGateway, UpstreamRequest};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
}

impl HttpUpstream {
    /// Without a timeout a hung upstream holds the request open indefinitely
    pub fn new(timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl UpstreamGateway for HttpUpstream {
    async fn send(&self, request: UpstreamRequest) -> Result<Value, ProxyError> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(authorization) = request.authorization {
            builder = builder.header(AUTHORIZATION, authorization);
        }
        if let Some(body) = request.body {
            let payload = serde_json::to_vec(&body).map_err(|e| ProxyError::Decode(e.to_string()))?;
            builder = builder.body(payload);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ProxyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProxyError::UpstreamStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProxyError::Transport(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| ProxyError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{OriginalUri, Request};
    use axum::http::{HeaderMap, Method, StatusCode};
    use axum::routing::{any, get};
    use axum::{Json, Router};
    use serde_json::json;

    async fn echo(method: Method, uri: OriginalUri, headers: HeaderMap, body: String) -> Json<Value> {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Json(json!({
            "method": method.as_str(),
            "uri": uri.0.to_string(),
            "contentType": header("content-type"),
            "authorization": header("authorization"),
            "body": body,
        }))
    }

    async fn spawn_upstream() -> String {
        let app = Router::new()
            .route("/api/echo", any(echo))
            .route("/api/missing", get(|| async { StatusCode::NOT_FOUND }))
            .route("/api/text", get(|| async { "definitely not json" }))
            .route(
                "/api/slow",
                get(|_req: Request| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "{}"
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn request(method: Method, url: String) -> UpstreamRequest {
        UpstreamRequest {
            method,
            url,
            authorization: None,
            body: None,
        }
    }

    #[tokio::test]
    async fn test_sends_headers_and_body() {
        let base = spawn_upstream().await;
        let upstream = HttpUpstream::new(None).unwrap();

        let mut req = request(Method::POST, format!("{}/api/echo?x=1", base));
        req.authorization = Some("Bearer abc".to_string());
        req.body = Some(json!({"name": "Abrigo Central"}));

        let echoed = upstream.send(req).await.unwrap();
        assert_eq!(echoed["method"], "POST");
        assert_eq!(echoed["uri"], "/api/echo?x=1");
        assert_eq!(echoed["contentType"], "application/json");
        assert_eq!(echoed["authorization"], "Bearer abc");
        assert_eq!(echoed["body"], r#"{"name":"Abrigo Central"}"#);
    }

    #[tokio::test]
    async fn test_get_without_credentials() {
        let base = spawn_upstream().await;
        let upstream = HttpUpstream::new(None).unwrap();

        let echoed = upstream
            .send(request(Method::GET, format!("{}/api/echo", base)))
            .await
            .unwrap();
        assert_eq!(echoed["contentType"], "application/json");
        assert!(echoed["authorization"].is_null());
        assert_eq!(echoed["body"], "");
    }

    #[tokio::test]
    async fn test_error_status() {
        let base = spawn_upstream().await;
        let upstream = HttpUpstream::new(None).unwrap();

        let err = upstream
            .send(request(Method::GET, format!("{}/api/missing", base)))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProxyError::UpstreamStatus {
                status: 404,
                reason: "Not Found".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_invalid_json_body() {
        let base = spawn_upstream().await;
        let upstream = HttpUpstream::new(None).unwrap();

        let err = upstream
            .send(request(Method::GET, format!("{}/api/text", base)))
            .await
            .unwrap_err();
        assert!(matches!(err, ProxyError::Decode(_)));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Bind then drop to get a port nobody listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let upstream = HttpUpstream::new(None).unwrap();
        let err = upstream
            .send(request(Method::GET, format!("http://{}/api/echo", addr)))
            .await
            .unwrap_err();
        assert!(matches!(err, ProxyError::Transport(_)));
    }

    #[tokio::test]
    async fn test_configured_timeout() {
        let base = spawn_upstream().await;
        let upstream = HttpUpstream::new(Some(Duration::from_millis(200))).unwrap();

        let err = upstream
            .send(request(Method::GET, format!("{}/api/slow", base)))
            .await
            .unwrap_err();
        assert!(matches!(err, ProxyError::Transport(_)));
    }
}
