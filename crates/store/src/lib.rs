pub mod backend;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod repo;

use std::sync::Arc;

use tracing::{info, warn};

use flightwatch_core::config::{StoreBackendKind, StoreConfig};

pub use backend::{DocumentStore, KeyedDocument, UpsertSummary};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;
pub use query::{CollectionTotals, DelayStats, FlightQuery};
pub use repo::{delete_records, load_records, upsert_records};

/// Open the configured document store.
///
/// Postgres when requested (or when `DATABASE_URL` is set without an explicit
/// backend), otherwise the in-memory store.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    match config.resolved_backend() {
        StoreBackendKind::Postgres => {
            let store = PgDocumentStore::connect(config).await?;
            info!("Store: postgres backend");
            Ok(Arc::new(store))
        }
        StoreBackendKind::Memory => {
            warn!("Store: in-memory backend, documents are lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_backend_opens_without_database() {
        let store = open_store(&StoreConfig::memory()).await.unwrap();
        assert_eq!(store.backend_name(), "memory");
    }

    #[tokio::test]
    async fn explicit_postgres_without_url_is_not_configured() {
        let mut config = StoreConfig::memory();
        config.backend = Some(StoreBackendKind::Postgres);
        let err = open_store(&config).await.err().expect("should fail");
        assert!(matches!(err, StoreError::NotConfigured(_)));
    }
}
