use std::sync::Arc;

use tokio::sync::RwLock;

use flightwatch_core::{Config, DelayPolicy};
use flightwatch_ingest::SharedReport;
use flightwatch_store::DocumentStore;

/// Shared handler state.
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub policy: DelayPolicy,
    /// Latest poller cycle; stays `None` when polling is disabled.
    pub last_report: SharedReport,
    pub polling: bool,
    /// Redacted config for `/status`.
    pub config_summary: serde_json::Value,
}

impl AppState {
    pub fn new(config: &Config, store: Arc<dyn DocumentStore>, last_report: Option<SharedReport>) -> Self {
        Self {
            store,
            policy: config.poller.delay_policy(),
            polling: last_report.is_some(),
            last_report: last_report.unwrap_or_else(|| Arc::new(RwLock::new(None))),
            config_summary: config.redacted_summary(),
        }
    }
}
