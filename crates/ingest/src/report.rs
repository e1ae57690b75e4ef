use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use flightwatch_core::Collection;
use flightwatch_store::{CollectionTotals, UpsertSummary};

/// Result of ingesting one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct EntityReport {
    pub collection: Collection,
    /// Raw records returned by the provider.
    pub fetched: usize,
    /// Records that survived normalization and were upserted.
    pub stored: usize,
    /// Records dropped during normalization.
    pub skipped: usize,
    pub inserted: u64,
    pub updated: u64,
}

impl EntityReport {
    pub(crate) fn new(
        collection: Collection,
        fetched: usize,
        skipped: usize,
        stored: usize,
        summary: UpsertSummary,
    ) -> Self {
        Self {
            collection,
            fetched,
            stored,
            skipped,
            inserted: summary.inserted,
            updated: summary.updated,
        }
    }
}

/// Per-entity outcome within a cycle; a failure here does not stop the others.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct EntityOutcome {
    pub collection: Collection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<EntityReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EntityOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct DeriveReport {
    pub flights_scanned: usize,
    /// Flights whose stored delay disagreed with their timestamps and were rewritten.
    pub flights_corrected: usize,
    pub delay_records_written: usize,
    pub delay_records_pruned: u64,
}

/// Summary of one polling cycle, exposed on the status endpoint.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct CycleReport {
    pub cycle_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub entities: Vec<EntityOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derive: Option<DeriveReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derive_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub totals: Option<CollectionTotals>,
}

impl CycleReport {
    pub fn failed_entities(&self) -> usize {
        self.entities.iter().filter(|e| !e.is_ok()).count()
    }

    pub fn is_clean(&self) -> bool {
        self.failed_entities() == 0 && self.derive_error.is_none()
    }
}
