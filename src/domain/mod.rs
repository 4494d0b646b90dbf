// Domain layer - Dashboard data and client-side state
pub mod charts;
pub mod filters;
pub mod polling;
pub mod risk;
pub mod snapshot;
