use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    uptime_seconds: u64,
    stores: StoreHealth,
}

#[derive(Serialize)]
pub struct StoreHealth {
    users: usize,
    sessions: usize,
    events: usize,
}

/// Health check endpoint
///
/// The stores are in-memory, so reachability is the only failure mode;
/// the counters are exposed for dashboards and smoke tests.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        stores: StoreHealth {
            users: state.auth.user_count().await,
            sessions: state.auth.session_count().await,
            events: state.events.count().await,
        },
    })
}
