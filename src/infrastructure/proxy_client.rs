// Dashboard source that reads snapshots through the proxy's /api/dashboard route
use crate::application::dashboard_source::{DashboardSource, FetchError};
use crate::domain::filters::FilterSet;
use crate::domain::snapshot::DashboardSnapshot;
use crate::infrastructure::http_response::ErrorEnvelope;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct ProxyDashboardClient {
    client: reqwest::Client,
    base_url: String,
}

impl ProxyDashboardClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, filters: &FilterSet) -> String {
        format!("{}{}", self.base_url, filters.dashboard_path())
    }
}

#[async_trait]
impl DashboardSource for ProxyDashboardClient {
    async fn fetch(&self, filters: &FilterSet) -> Result<DashboardSnapshot, FetchError> {
        let url = self.url_for(filters);
        tracing::debug!(%url, "Requesting dashboard");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Prefer the envelope's details; fall back to the bare status
            let details = response
                .json::<ErrorEnvelope>()
                .await
                .ok()
                .map(|envelope| envelope.details)
                .filter(|d| !d.is_empty());
            return Err(FetchError::Rejected(
                details.unwrap_or_else(|| format!("Erro {}", status.as_u16())),
            ));
        }

        response
            .json::<DashboardSnapshot>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::RawQuery;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    async fn spawn_proxy(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_fetch_with_filters() {
        let router = Router::new().route(
            "/api/dashboard",
            get(|RawQuery(query): RawQuery| async move {
                Json(json!({
                    "totalAlerts": 3,
                    "geographicHotspots": [],
                    "echoQuery": query
                }))
            }),
        );
        let base = spawn_proxy(router).await;
        let client = ProxyDashboardClient::new(format!("{}/", base));

        let mut filters = FilterSet::new();
        filters.set("radiusKm", "10").unwrap();
        assert_eq!(client.url_for(&filters), format!("{}/api/dashboard?radiusKm=10", base));

        let snapshot = client.fetch(&filters).await.unwrap();
        assert_eq!(snapshot.total_alerts, 3);
    }

    #[tokio::test]
    async fn test_error_envelope_details() {
        let router = Router::new().route(
            "/api/dashboard",
            get(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Erro ao conectar com a API",
                        "details": "API retornou status 404: Not Found",
                        "tip": "Verifique se sua API está rodando"
                    })),
                )
                    .into_response()
            }),
        );
        let base = spawn_proxy(router).await;

        let err = ProxyDashboardClient::new(base)
            .fetch(&FilterSet::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            FetchError::Rejected("API retornou status 404: Not Found".to_string())
        );
    }

    #[tokio::test]
    async fn test_bare_error_status() {
        let router = Router::new().route("/api/dashboard", get(|| async { StatusCode::BAD_GATEWAY }));
        let base = spawn_proxy(router).await;

        let err = ProxyDashboardClient::new(base)
            .fetch(&FilterSet::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Erro 502");
    }
}
