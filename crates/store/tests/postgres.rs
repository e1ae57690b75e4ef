//! PostgreSQL backend tests.
//!
//! Need a reachable database and are `#[ignore]`d by default:
//!
//!   DATABASE_URL=postgres://localhost/flightwatch_test cargo test -p flightwatch-store -- --ignored

use flightwatch_core::config::{StoreBackendKind, StoreConfig};
use flightwatch_core::Collection;
use flightwatch_store::{DocumentStore, KeyedDocument, PgDocumentStore, UpsertSummary};
use serde_json::json;

async fn connect() -> Option<PgDocumentStore> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    };
    let config = StoreConfig {
        backend: Some(StoreBackendKind::Postgres),
        database_url: Some(url),
        max_connections: 2,
    };
    Some(
        PgDocumentStore::connect(&config)
            .await
            .expect("connect and migrate"),
    )
}

/// Key prefix unique to one test run, so tests can share a database.
fn prefix() -> String {
    format!("t{}-", uuid::Uuid::new_v4().simple())
}

fn doc(key: &str, body: serde_json::Value) -> KeyedDocument {
    KeyedDocument {
        key: key.to_string(),
        body,
    }
}

async fn own_docs(store: &PgDocumentStore, collection: Collection, prefix: &str) -> Vec<KeyedDocument> {
    store
        .find_all(collection)
        .await
        .unwrap()
        .into_iter()
        .filter(|d| d.key.starts_with(prefix))
        .collect()
}

#[ignore]
#[tokio::test]
async fn upsert_counts_insert_then_update() {
    let Some(store) = connect().await else { return };
    let p = prefix();
    let key = format!("{p}LH400");

    let first = store
        .bulk_upsert(Collection::Flights, vec![doc(&key, json!({ "status": "scheduled" }))])
        .await
        .unwrap();
    assert_eq!(first, UpsertSummary { inserted: 1, updated: 0 });

    let second = store
        .bulk_upsert(Collection::Flights, vec![doc(&key, json!({ "status": "landed" }))])
        .await
        .unwrap();
    assert_eq!(second, UpsertSummary { inserted: 0, updated: 1 });

    let docs = own_docs(&store, Collection::Flights, &p).await;
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].body["status"], "landed");

    store.delete_many(Collection::Flights, &[key]).await.unwrap();
}

#[ignore]
#[tokio::test]
async fn duplicate_key_in_batch_keeps_last_body() {
    let Some(store) = connect().await else { return };
    let p = prefix();
    let key = format!("{p}X1");

    let summary = store
        .bulk_upsert(
            Collection::Flights,
            vec![doc(&key, json!({ "n": 1 })), doc(&key, json!({ "n": 2 }))],
        )
        .await
        .unwrap();
    assert_eq!(summary, UpsertSummary { inserted: 1, updated: 1 });

    let docs = own_docs(&store, Collection::Flights, &p).await;
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].body["n"], 2);

    store.delete_many(Collection::Flights, &[key]).await.unwrap();
}

#[ignore]
#[tokio::test]
async fn delete_counts_only_existing_keys() {
    let Some(store) = connect().await else { return };
    let p = prefix();
    let a = format!("{p}A");
    let b = format!("{p}B");

    store
        .bulk_upsert(Collection::Delays, vec![doc(&a, json!({})), doc(&b, json!({}))])
        .await
        .unwrap();

    let removed = store
        .delete_many(Collection::Delays, &[a.clone(), format!("{p}missing")])
        .await
        .unwrap();
    assert_eq!(removed, 1);

    // Same key in another collection is untouched.
    assert_eq!(store.delete_many(Collection::Airports, &[b.clone()]).await.unwrap(), 0);

    let left: Vec<String> = own_docs(&store, Collection::Delays, &p)
        .await
        .into_iter()
        .map(|d| d.key)
        .collect();
    assert_eq!(left, vec![b.clone()]);

    store.delete_many(Collection::Delays, &[b]).await.unwrap();
}

#[ignore]
#[tokio::test]
async fn find_all_is_ordered_by_key() {
    let Some(store) = connect().await else { return };
    let p = prefix();
    let keys: Vec<String> = ["MUC", "BER", "FRA"].iter().map(|k| format!("{p}{k}")).collect();

    store
        .bulk_upsert(
            Collection::Airports,
            keys.iter().map(|k| doc(k, json!({ "iata_code": k }))).collect(),
        )
        .await
        .unwrap();

    let found: Vec<String> = own_docs(&store, Collection::Airports, &p)
        .await
        .into_iter()
        .map(|d| d.key)
        .collect();
    assert_eq!(found, vec![format!("{p}BER"), format!("{p}FRA"), format!("{p}MUC")]);
    assert!(store.count(Collection::Airports).await.unwrap() >= 3);

    store.delete_many(Collection::Airports, &keys).await.unwrap();
}
