//! HTTP route tree
//!
//! Everything hangs off `/api/v1` except the bare `/healthz` liveness
//! probe. Each module owns its own router; auth requirements are applied
//! per sub-router so the public/protected split is visible in one place.

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod health;
pub mod ratings;
pub mod resources;
pub mod roadmaps;

pub fn create_router(state: AppState) -> Router {
    let v1 = Router::new()
        .nest("/auth", auth::router(state.clone()))
        .nest("/catalog", catalog::router())
        .nest("/resources", resources::router(state.clone()))
        .nest("/ratings", ratings::router(state.clone()))
        .nest("/roadmaps", roadmaps::router(state.clone()))
        .nest("/admin", admin::router(state.clone()));

    Router::new()
        .route("/healthz", get(health::healthz))
        .nest("/api/v1", v1)
        .with_state(state)
}
