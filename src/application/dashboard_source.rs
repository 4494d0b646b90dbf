// Source of dashboard snapshots for the polling controller
use crate::domain::filters::FilterSet;
use crate::domain::snapshot::DashboardSnapshot;
use async_trait::async_trait;
use thiserror::Error;

/// Why a fetch failed. The message is shown to the user as-is.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// Proxy answered with an error envelope or a bare error status
    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Decode(String),
}

#[async_trait]
pub trait DashboardSource: Send + Sync {
    async fn fetch(&self, filters: &FilterSet) -> Result<DashboardSnapshot, FetchError>;
}
