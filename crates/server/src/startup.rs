//! Wiring of store, provider and poller from config.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use flightwatch_core::Config;
use flightwatch_ingest::{DelayDeriver, IngestionPipeline, Poller};
use flightwatch_provider::AviationStackClient;
use flightwatch_store::DocumentStore;

pub async fn open_store(config: &Config) -> anyhow::Result<Arc<dyn DocumentStore>> {
    flightwatch_store::open_store(&config.store)
        .await
        .context("failed to open document store")
}

pub fn build_poller(config: &Config, store: Arc<dyn DocumentStore>) -> anyhow::Result<Poller> {
    let provider = AviationStackClient::from_config(&config.provider)
        .context("failed to build provider client")?;
    info!(provider = %config.provider.base_url, "provider client ready");

    let pipeline = IngestionPipeline::new(Arc::new(provider), store.clone(), config.provider.clone());
    let deriver = DelayDeriver::new(
        store,
        config.poller.delay_policy(),
        config.poller.prune_stale_delays,
    );
    Ok(Poller::new(pipeline, deriver, config.poller.interval()))
}
