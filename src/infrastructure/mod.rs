// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod geojson_map;
pub mod http_response;
pub mod log_map;
pub mod proxy_client;
pub mod upstream_client;
