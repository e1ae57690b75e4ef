use async_trait::async_trait;
use serde::Serialize;

use flightwatch_core::Collection;

use crate::error::StoreError;

/// A schemaless document addressed by its natural key.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedDocument {
    pub key: String,
    pub body: serde_json::Value,
}

/// Outcome of a batched upsert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpsertSummary {
    /// Keys that did not exist before the batch.
    pub inserted: u64,
    /// Keys whose document was replaced.
    pub updated: u64,
}

impl UpsertSummary {
    pub fn total(&self) -> u64 {
        self.inserted + self.updated
    }
}

/// Keyed document storage shared by ingestion and the query surface.
///
/// `bulk_upsert` replaces the full document for each key or inserts it;
/// a batch is applied atomically where the backend allows it. Reads may
/// run concurrently with an upsert batch.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert-or-replace every document in `docs`, keyed by `KeyedDocument::key`.
    /// A key repeated inside one batch ends up with its last body.
    async fn bulk_upsert(
        &self,
        collection: Collection,
        docs: Vec<KeyedDocument>,
    ) -> Result<UpsertSummary, StoreError>;

    /// All documents of a collection, ordered by key.
    async fn find_all(&self, collection: Collection) -> Result<Vec<KeyedDocument>, StoreError>;

    /// Remove the given keys; returns how many existed.
    async fn delete_many(&self, collection: Collection, keys: &[String]) -> Result<u64, StoreError>;

    async fn count(&self, collection: Collection) -> Result<u64, StoreError>;

    /// Backend name for logs and health output.
    fn backend_name(&self) -> &'static str;
}
