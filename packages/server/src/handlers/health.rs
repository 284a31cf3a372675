use axum::Json;
use axum::extract::State;

use crate::models::health::{DatabaseHealth, HealthResponse};
use crate::state::AppState;

/// Reports liveness and the connection state. Never opens a connection.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    operation_id = "health",
    summary = "Service health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        database: DatabaseHealth {
            name: state.db.database_name().to_string(),
            state: state.db.state(),
            attempts: state.db.attempts(),
        },
    })
}
