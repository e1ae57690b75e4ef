//! Typed access to the document store through [`Record`].

use tracing::warn;

use flightwatch_core::Record;

use crate::backend::{DocumentStore, KeyedDocument, UpsertSummary};
use crate::error::StoreError;

/// Serialize and upsert `records` into their collection in one batch.
///
/// Fails before writing anything if any record has a blank key.
pub async fn upsert_records<R: Record>(
    store: &dyn DocumentStore,
    records: &[R],
) -> Result<UpsertSummary, StoreError> {
    if records.is_empty() {
        return Ok(UpsertSummary::default());
    }
    let docs = records
        .iter()
        .map(|r| -> Result<KeyedDocument, StoreError> {
            Ok(KeyedDocument {
                key: r.checked_key()?.to_string(),
                body: serde_json::to_value(r)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    store.bulk_upsert(R::COLLECTION, docs).await
}

/// Load every document of `R`'s collection.
///
/// Documents that no longer match the record shape are logged and skipped.
pub async fn load_records<R: Record>(store: &dyn DocumentStore) -> Result<Vec<R>, StoreError> {
    let docs = store.find_all(R::COLLECTION).await?;
    let mut records = Vec::with_capacity(docs.len());
    for doc in docs {
        match serde_json::from_value::<R>(doc.body) {
            Ok(r) => records.push(r),
            Err(e) => warn!(
                collection = %R::COLLECTION,
                key = %doc.key,
                error = %e,
                "skipping undecodable document"
            ),
        }
    }
    Ok(records)
}

pub async fn delete_records<R: Record>(
    store: &dyn DocumentStore,
    keys: &[String],
) -> Result<u64, StoreError> {
    store.delete_many(R::COLLECTION, keys).await
}
