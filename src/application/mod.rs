// Application layer - Use cases and the seams to external systems
pub mod dashboard_source;
pub mod map_renderer;
pub mod poll_scheduler;
pub mod polling_controller;
pub mod proxy_service;
pub mod upstream_gateway;
