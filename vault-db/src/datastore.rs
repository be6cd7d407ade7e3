//! Datastore connection handling

use surrealdb::engine::any::{self, Any};
use surrealdb::Surreal;
use vault_core::{VaultError, VaultResult};

use crate::error::map_db_error;
use crate::schema::VAULT_SCHEMA;

/// Shared database handle. Cloning is cheap.
pub type Db = Surreal<Any>;

/// Connect to the datastore and select the namespace/database.
///
/// `endpoint` accepts any engine the driver supports; tests use `mem://`.
pub async fn connect(endpoint: &str, namespace: &str, database: &str) -> VaultResult<Db> {
    let db = any::connect(endpoint).await.map_err(map_db_error)?;
    db.use_ns(namespace)
        .use_db(database)
        .await
        .map_err(map_db_error)?;
    tracing::info!(endpoint = %endpoint, namespace = %namespace, "datastore connected");
    Ok(db)
}

/// Apply the schema (tables, unique indexes, search index). Idempotent.
pub async fn init_schema(db: &Db) -> VaultResult<()> {
    db.query(VAULT_SCHEMA)
        .await
        .map_err(|e| VaultError::Storage(format!("schema init failed: {e}")))?;
    tracing::debug!("schema applied");
    Ok(())
}
