// Application state for HTTP handlers
use crate::application::proxy_service::ProxyService;

#[derive(Clone)]
pub struct AppState {
    pub proxy_service: ProxyService,
    pub dashboard_tip: String,
    pub passthrough_tip: String,
}
