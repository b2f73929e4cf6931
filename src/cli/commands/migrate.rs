use anyhow::{bail, Context};

use crate::config::{AppConfig, StoreBackend};
use crate::database::PgStore;

pub async fn handle(config: AppConfig) -> anyhow::Result<()> {
    if config.database.backend != StoreBackend::Postgres {
        bail!("migrate only applies to the postgres backend");
    }

    let store = PgStore::connect(&config.database)
        .await
        .context("failed to connect to the database")?;
    store.migrate().await.context("schema migration failed")?;
    store.close().await;

    println!("Schema is up to date");
    Ok(())
}
