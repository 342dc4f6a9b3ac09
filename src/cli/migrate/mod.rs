//! Migrate command - creates the operations table

use anyhow::Context;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::operation::{OperationRepositoryFactory, StorageConfig};

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&config.logging)?;

    let StorageConfig::Postgres(pg_config) = config.storage.to_storage_config()? else {
        anyhow::bail!("migrate requires the postgres storage backend (storage.backend = \"postgres\")");
    };

    OperationRepositoryFactory::create_postgres(&pg_config).await?;
    info!("Operations table is ready");

    Ok(())
}
