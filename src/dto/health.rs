//! Health check response payload.

use serde::Serialize;
use utoipa::ToSchema;

/// Overall backend health as reported by `GET /healthcheck`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// The result store is installed and answered the last ping.
    Ok,
    /// Running without a reachable result store.
    Degraded,
}

/// Body returned by the health check route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Current status.
    pub status: HealthStatus,
}

impl From<HealthStatus> for HealthResponse {
    fn from(status: HealthStatus) -> Self {
        Self { status }
    }
}
