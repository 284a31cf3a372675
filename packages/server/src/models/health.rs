use serde::Serialize;

use crate::database::ConnectionState;

/// Document store connection as seen by this process.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DatabaseHealth {
    /// Logical database name.
    #[schema(example = "koigor")]
    pub name: String,
    /// Current connection state.
    #[schema(example = "connected")]
    pub state: ConnectionState,
    /// Connection attempts made since startup.
    #[schema(example = 1)]
    pub attempts: u64,
}

/// Response model for the health endpoint.
#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: &'static str,
    /// Server version.
    #[schema(example = "0.1.0")]
    pub version: &'static str,
    /// Seconds since the server started.
    #[schema(example = 42)]
    pub uptime_seconds: u64,
    pub database: DatabaseHealth,
}
