//! API server setup

use std::net::SocketAddr;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use axum::http::{HeaderValue, Method};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use vault_db::Db;

use crate::config::ApiConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the router and bind address from config and a connected datastore.
pub async fn create_server(
    config: &ApiConfig,
    datastore: Db,
) -> Result<(Router, SocketAddr), Box<dyn std::error::Error + Send + Sync>> {
    let state = AppState::new(datastore, config).await?;

    let mut router = create_router(state);

    router = router.layer(TraceLayer::new_for_http());
    router = router.layer(cors_layer(config)?);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    Ok((router, addr))
}

/// Run the API server until the process exits.
pub async fn run_server(
    config: &ApiConfig,
    datastore: Db,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let (router, addr) = create_server(config, datastore).await?;

    tracing::info!("study vault API listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// Cookie-carrying requests need a concrete origin with credentials;
/// without CORS_ORIGIN the layer stays permissive for bearer-only clients.
fn cors_layer(
    config: &ApiConfig,
) -> Result<CorsLayer, Box<dyn std::error::Error + Send + Sync>> {
    let layer = match config.cors_origin.as_deref() {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE, COOKIE])
            .allow_credentials(true),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };
    Ok(layer)
}
