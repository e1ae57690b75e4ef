//! PostgreSQL document store: one JSONB table keyed by `(collection, key)`.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use flightwatch_core::config::StoreConfig;
use flightwatch_core::Collection;

use crate::backend::{DocumentStore, KeyedDocument, UpsertSummary};
use crate::error::StoreError;

pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Connect and apply migrations.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let url = config
            .database_url
            .as_deref()
            .ok_or_else(|| StoreError::NotConfigured("DATABASE_URL not set".into()))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(url)
            .await?;
        info!(max_connections = config.max_connections, "PostgreSQL connected");

        sqlx::migrate!("../../migrations").run(&pool).await?;
        info!("Database migrations applied successfully");

        Ok(Self { pool })
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn bulk_upsert(
        &self,
        collection: Collection,
        docs: Vec<KeyedDocument>,
    ) -> Result<UpsertSummary, StoreError> {
        let mut summary = UpsertSummary::default();
        if docs.is_empty() {
            return Ok(summary);
        }

        let mut tx = self.pool.begin().await?;
        for doc in docs {
            // xmax = 0 only for rows created by this statement.
            let inserted = sqlx::query_scalar::<_, bool>(
                "INSERT INTO documents (collection, key, body)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (collection, key)
                 DO UPDATE SET body = EXCLUDED.body, updated_at = now()
                 RETURNING (xmax = 0)",
            )
            .bind(collection.as_str())
            .bind(&doc.key)
            .bind(&doc.body)
            .fetch_one(&mut *tx)
            .await?;

            if inserted {
                summary.inserted += 1;
            } else {
                summary.updated += 1;
            }
        }
        tx.commit().await?;

        Ok(summary)
    }

    async fn find_all(&self, collection: Collection) -> Result<Vec<KeyedDocument>, StoreError> {
        let rows = sqlx::query_as::<_, (String, serde_json::Value)>(
            "SELECT key, body FROM documents WHERE collection = $1 ORDER BY key",
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(key, body)| KeyedDocument { key, body })
            .collect())
    }

    async fn delete_many(&self, collection: Collection, keys: &[String]) -> Result<u64, StoreError> {
        if keys.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND key = ANY($2)")
            .bind(collection.as_str())
            .bind(keys)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count(&self, collection: Collection) -> Result<u64, StoreError> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM documents WHERE collection = $1")
            .bind(collection.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(n.max(0) as u64)
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
