//! Study Vault server entry point

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vault_api::{run_server, ApiConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,vault_api=debug,vault_db=debug"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();

    let config = ApiConfig::from_env()?;

    tracing::info!(
        endpoint = %config.database_url,
        ns = %config.db_namespace,
        db = %config.db_name,
        "connecting to datastore"
    );
    let datastore = vault_db::connect(
        &config.database_url,
        &config.db_namespace,
        &config.db_name,
    )
    .await?;

    run_server(&config, datastore).await
}
