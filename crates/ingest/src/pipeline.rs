//! Fetch, normalize and upsert one page per entity type.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use flightwatch_core::config::ProviderConfig;
use flightwatch_core::{Collection, Record};
use flightwatch_provider::{
    normalize_airline, normalize_airport, normalize_batch, normalize_flight, FetchRequest,
    FlightDataProvider, NormalizeError,
};
use flightwatch_store::{upsert_records, DocumentStore};

use crate::error::IngestError;
use crate::report::{EntityOutcome, EntityReport};

pub struct IngestionPipeline {
    provider: Arc<dyn FlightDataProvider>,
    store: Arc<dyn DocumentStore>,
    scope: ProviderConfig,
    call_timeout: Duration,
}

impl IngestionPipeline {
    /// `scope` supplies the filters and page limits; `call_timeout` bounds
    /// each provider request.
    pub fn new(
        provider: Arc<dyn FlightDataProvider>,
        store: Arc<dyn DocumentStore>,
        scope: ProviderConfig,
    ) -> Self {
        let call_timeout = scope.timeout();
        Self {
            provider,
            store,
            scope,
            call_timeout,
        }
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub async fn ingest_airports(&self) -> Result<EntityReport, IngestError> {
        let request = FetchRequest::airports(&self.scope);
        self.ingest(&request, normalize_airport).await
    }

    pub async fn ingest_airlines(&self) -> Result<EntityReport, IngestError> {
        let request = FetchRequest::airlines(&self.scope);
        self.ingest(&request, normalize_airline).await
    }

    pub async fn ingest_flights(&self) -> Result<EntityReport, IngestError> {
        let request = FetchRequest::flights(&self.scope);
        let observed_at = Utc::now();
        self.ingest(&request, |value| normalize_flight(value, observed_at))
            .await
    }

    /// Ingest every entity type in order. A failure is logged and recorded
    /// in its outcome; the remaining entity types still run.
    pub async fn run(&self) -> Vec<EntityOutcome> {
        let mut outcomes = Vec::with_capacity(3);
        outcomes.push(outcome(Collection::Airports, self.ingest_airports().await));
        outcomes.push(outcome(Collection::Airlines, self.ingest_airlines().await));
        outcomes.push(outcome(Collection::Flights, self.ingest_flights().await));
        outcomes
    }

    async fn ingest<R, F>(&self, request: &FetchRequest, normalize: F) -> Result<EntityReport, IngestError>
    where
        R: Record,
        F: Fn(&Value) -> Result<R, NormalizeError>,
    {
        let page = self.fetch(request).await?;
        let (records, rejected) = normalize_batch(request.endpoint.path(), &page, normalize);
        let summary = upsert_records(self.store.as_ref(), &records).await?;

        let report = EntityReport::new(R::COLLECTION, page.len(), rejected.len(), records.len(), summary);
        info!(
            collection = %R::COLLECTION,
            provider = self.provider.name(),
            fetched = report.fetched,
            stored = report.stored,
            skipped = report.skipped,
            inserted = report.inserted,
            updated = report.updated,
            "ingested page"
        );
        Ok(report)
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<Value>, IngestError> {
        match tokio::time::timeout(self.call_timeout, self.provider.fetch_page(request)).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(IngestError::Timeout(self.call_timeout)),
        }
    }
}

fn outcome(collection: Collection, result: Result<EntityReport, IngestError>) -> EntityOutcome {
    match result {
        Ok(report) => EntityOutcome {
            collection,
            report: Some(report),
            error: None,
        },
        Err(e) => {
            warn!(collection = %collection, error = %e, "ingestion failed, skipping until next cycle");
            EntityOutcome {
                collection,
                report: None,
                error: Some(e.to_string()),
            }
        }
    }
}
