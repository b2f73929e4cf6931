pub mod memory;
pub mod models;
pub mod postgres;
pub mod schema;
pub mod store;

use std::sync::Arc;

use crate::config::{DatabaseConfig, StoreBackend};

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{Store, StoreError};

/// Build the configured store, migrating the schema first when asked to
pub async fn open(config: &DatabaseConfig) -> Result<Arc<dyn Store>, StoreError> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on shutdown");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let store = PgStore::connect(config).await?;
            if config.auto_migrate {
                store.migrate().await?;
            } else {
                tracing::info!("Schema migration skipped");
            }
            Ok(Arc::new(store))
        }
    }
}
