// Presentation layer - HTTP routes and the terminal dashboard
pub mod app_state;
pub mod commands;
pub mod handlers;
pub mod monitor;
pub mod terminal;
