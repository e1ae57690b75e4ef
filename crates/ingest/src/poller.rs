//! Interval driver for ingestion plus delay derivation.
//!
//! Cycles never overlap: the poller sleeps the full interval after a cycle
//! completes. It runs until [`Poller::shutdown_handle`] is notified; a
//! notification that arrives mid-cycle takes effect once the cycle ends.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::{Notify, RwLock};
use tracing::{error, info, warn};
use uuid::Uuid;

use flightwatch_store::query::collection_totals;

use crate::deriver::DelayDeriver;
use crate::pipeline::IngestionPipeline;
use crate::report::CycleReport;

/// Most recent cycle, shared with readers such as the status endpoint.
pub type SharedReport = Arc<RwLock<Option<CycleReport>>>;

pub struct Poller {
    pipeline: IngestionPipeline,
    deriver: DelayDeriver,
    interval: Duration,
    shutdown: Arc<Notify>,
    last_report: SharedReport,
}

impl Poller {
    pub fn new(pipeline: IngestionPipeline, deriver: DelayDeriver, interval: Duration) -> Self {
        Self {
            pipeline,
            deriver,
            interval,
            shutdown: Arc::new(Notify::new()),
            last_report: Arc::new(RwLock::new(None)),
        }
    }

    /// Handle that stops [`Poller::run`]. `notify_one` stores a permit, so a
    /// stop requested before the loop reaches its wait is not lost.
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        self.shutdown.clone()
    }

    pub fn last_report(&self) -> SharedReport {
        self.last_report.clone()
    }

    /// Run one full cycle: ingestion, then derivation, then totals.
    ///
    /// Never fails; problems are logged and recorded in the report.
    pub async fn run_cycle(&self) -> CycleReport {
        let cycle_id = Uuid::new_v4();
        let started_at = Utc::now();
        let clock = Instant::now();
        info!(%cycle_id, "polling cycle started");

        let entities = self.pipeline.run().await;

        let (derive, derive_error) = match self.deriver.derive().await {
            Ok(report) => (Some(report), None),
            Err(e) => {
                error!(%cycle_id, error = %e, "delay derivation failed");
                (None, Some(e.to_string()))
            }
        };

        let totals = match collection_totals(self.pipeline.store().as_ref()).await {
            Ok(t) => Some(t),
            Err(e) => {
                warn!(%cycle_id, error = %e, "failed to count collections");
                None
            }
        };

        let report = CycleReport {
            cycle_id,
            started_at,
            finished_at: Utc::now(),
            duration_ms: clock.elapsed().as_millis() as u64,
            entities,
            derive,
            derive_error,
            totals,
        };

        info!(
            %cycle_id,
            duration_ms = report.duration_ms,
            failed_entities = report.failed_entities(),
            clean = report.is_clean(),
            "polling cycle finished"
        );

        *self.last_report.write().await = Some(report.clone());
        report
    }

    /// Loop until stopped. The first cycle runs immediately.
    pub async fn run(&self) {
        info!(interval_secs = self.interval.as_secs(), "poller started");
        loop {
            self.run_cycle().await;

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = self.shutdown.notified() => {
                    info!("poller received shutdown signal");
                    break;
                }
            }
        }
        info!("poller stopped");
    }
}
