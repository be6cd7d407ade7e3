//! Application state for the API server

use std::sync::Arc;

use vault_core::VaultResult;
use vault_db::{CatalogService, Database, Db, RatingService, ResourceQuery};

use crate::auth::TokenKeys;
use crate::config::ApiConfig;
use crate::mailer::Mailer;

/// API server state, cloned per request
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub catalog: CatalogService,
    pub ratings: RatingService,
    pub resource_query: ResourceQuery,
    pub tokens: TokenKeys,
    pub mailer: Mailer,
    pub cookie_secure: bool,
    pub version: String,
}

impl AppState {
    /// Build state from a connected datastore; applies the schema.
    pub async fn new(datastore: Db, config: &ApiConfig) -> VaultResult<Self> {
        let db = Arc::new(Database::new(datastore));
        db.init_schema().await?;

        Ok(Self {
            catalog: CatalogService::new(db.clone()),
            ratings: RatingService::new(db.clone()),
            resource_query: ResourceQuery::new(db.clone()),
            tokens: TokenKeys::new(
                config.jwt_access_secret.clone(),
                config.jwt_refresh_secret.clone(),
                config.access_ttl,
                config.refresh_ttl,
            ),
            mailer: Mailer::new(),
            cookie_secure: config.cookie_secure,
            version: env!("CARGO_PKG_VERSION").to_string(),
            db,
        })
    }
}
