use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::dto::HealthResponse;
use crate::state::AppState;

/// Liveness probe. Deliberately does not touch the datastore.
pub async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: state.version.clone(),
        time: Utc::now(),
    })
}
