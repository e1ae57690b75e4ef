//! Recompute flight delays and maintain the delays collection.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use flightwatch_core::{delay_minutes, Collection, DelayPolicy, DelayRecord, Flight};
use flightwatch_store::{load_records, upsert_records, DocumentStore};

use crate::error::IngestError;
use crate::report::DeriveReport;

pub struct DelayDeriver {
    store: Arc<dyn DocumentStore>,
    policy: DelayPolicy,
    prune_stale: bool,
}

impl DelayDeriver {
    pub fn new(store: Arc<dyn DocumentStore>, policy: DelayPolicy, prune_stale: bool) -> Self {
        Self {
            store,
            policy,
            prune_stale,
        }
    }

    pub fn policy(&self) -> DelayPolicy {
        self.policy
    }

    /// Scan every stored flight:
    ///
    /// 1. rewrite flights whose `delay_minutes` does not match their timestamps,
    /// 2. upsert a delay record for each flight at or over the threshold,
    /// 3. optionally delete delay records whose flight no longer qualifies.
    pub async fn derive(&self) -> Result<DeriveReport, IngestError> {
        let store = self.store.as_ref();
        let flights: Vec<Flight> = load_records(store).await?;

        let mut corrected = Vec::new();
        let mut delayed: Vec<DelayRecord> = Vec::new();
        for flight in &flights {
            let expected = delay_minutes(flight.scheduled_departure, flight.actual_departure);
            if expected != flight.delay_minutes {
                debug!(
                    flight = %flight.flight_number,
                    stored = ?flight.delay_minutes,
                    expected = ?expected,
                    "correcting stored delay"
                );
                corrected.push(Flight {
                    delay_minutes: expected,
                    ..flight.clone()
                });
            }
            if let Some(record) = self.policy.classify(flight) {
                delayed.push(record);
            }
        }

        upsert_records(store, &corrected).await?;
        upsert_records(store, &delayed).await?;

        let delay_records_pruned = if self.prune_stale {
            self.prune(&delayed).await?
        } else {
            0
        };

        let report = DeriveReport {
            flights_scanned: flights.len(),
            flights_corrected: corrected.len(),
            delay_records_written: delayed.len(),
            delay_records_pruned,
        };
        info!(
            threshold_minutes = self.policy.threshold_minutes,
            scanned = report.flights_scanned,
            corrected = report.flights_corrected,
            delayed = report.delay_records_written,
            pruned = report.delay_records_pruned,
            "delay derivation complete"
        );
        Ok(report)
    }

    async fn prune(&self, current: &[DelayRecord]) -> Result<u64, IngestError> {
        let keep: HashSet<&str> = current.iter().map(|r| r.flight_number.as_str()).collect();
        let stale: Vec<String> = self
            .store
            .find_all(Collection::Delays)
            .await?
            .into_iter()
            .map(|doc| doc.key)
            .filter(|key| !keep.contains(key.as_str()))
            .collect();
        if stale.is_empty() {
            return Ok(0);
        }
        Ok(self.store.delete_many(Collection::Delays, &stale).await?)
    }
}
