//! In-process document store.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use flightwatch_core::Collection;

use crate::backend::{DocumentStore, KeyedDocument, UpsertSummary};
use crate::error::StoreError;

/// Collections held in memory; used when no database is configured and in tests.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, BTreeMap<String, serde_json::Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn bulk_upsert(
        &self,
        collection: Collection,
        docs: Vec<KeyedDocument>,
    ) -> Result<UpsertSummary, StoreError> {
        // One write guard per batch: readers see the batch all or nothing.
        let mut guard = self.collections.write().await;
        let docs_by_key = guard.entry(collection).or_default();
        let mut summary = UpsertSummary::default();
        for doc in docs {
            match docs_by_key.insert(doc.key, doc.body) {
                Some(_) => summary.updated += 1,
                None => summary.inserted += 1,
            }
        }
        Ok(summary)
    }

    async fn find_all(&self, collection: Collection) -> Result<Vec<KeyedDocument>, StoreError> {
        let guard = self.collections.read().await;
        Ok(guard
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .map(|(key, body)| KeyedDocument {
                        key: key.clone(),
                        body: body.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn delete_many(&self, collection: Collection, keys: &[String]) -> Result<u64, StoreError> {
        let mut guard = self.collections.write().await;
        let Some(docs) = guard.get_mut(&collection) else {
            return Ok(0);
        };
        Ok(keys.iter().filter(|k| docs.remove(*k).is_some()).count() as u64)
    }

    async fn count(&self, collection: Collection) -> Result<u64, StoreError> {
        let guard = self.collections.read().await;
        Ok(guard.get(&collection).map(|d| d.len() as u64).unwrap_or(0))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(key: &str, body: serde_json::Value) -> KeyedDocument {
        KeyedDocument {
            key: key.to_string(),
            body,
        }
    }

    #[tokio::test]
    async fn upsert_inserts_then_replaces() {
        let store = MemoryStore::new();
        let first = store
            .bulk_upsert(Collection::Flights, vec![doc("LH1", json!({"status": "scheduled"}))])
            .await
            .unwrap();
        assert_eq!(first, UpsertSummary { inserted: 1, updated: 0 });

        let second = store
            .bulk_upsert(Collection::Flights, vec![doc("LH1", json!({"status": "landed"}))])
            .await
            .unwrap();
        assert_eq!(second, UpsertSummary { inserted: 0, updated: 1 });

        let all = store.find_all(Collection::Flights).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].body["status"], "landed");
    }

    #[tokio::test]
    async fn collections_are_independent() {
        let store = MemoryStore::new();
        store
            .bulk_upsert(Collection::Airports, vec![doc("FRA", json!({}))])
            .await
            .unwrap();
        assert_eq!(store.count(Collection::Airports).await.unwrap(), 1);
        assert_eq!(store.count(Collection::Airlines).await.unwrap(), 0);
        assert!(store.find_all(Collection::Delays).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_keys_in_batch_keep_last() {
        let store = MemoryStore::new();
        let summary = store
            .bulk_upsert(
                Collection::Flights,
                vec![doc("X1", json!({"n": 1})), doc("X1", json!({"n": 2}))],
            )
            .await
            .unwrap();
        assert_eq!(summary.total(), 2);
        let all = store.find_all(Collection::Flights).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].body["n"], 2);
    }

    #[tokio::test]
    async fn delete_counts_existing_keys_only() {
        let store = MemoryStore::new();
        store
            .bulk_upsert(
                Collection::Delays,
                vec![doc("A", json!({})), doc("B", json!({}))],
            )
            .await
            .unwrap();
        let removed = store
            .delete_many(Collection::Delays, &["A".to_string(), "Z".to_string()])
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.count(Collection::Delays).await.unwrap(), 1);
        assert_eq!(
            store.delete_many(Collection::Airports, &["A".to_string()]).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn find_all_is_ordered_by_key() {
        let store = MemoryStore::new();
        store
            .bulk_upsert(
                Collection::Airports,
                vec![doc("MUC", json!({})), doc("BER", json!({})), doc("FRA", json!({}))],
            )
            .await
            .unwrap();
        let keys: Vec<String> = store
            .find_all(Collection::Airports)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.key)
            .collect();
        assert_eq!(keys, vec!["BER", "FRA", "MUC"]);
    }
}
