use std::time::Duration;

use flightwatch_provider::ProviderError;
use flightwatch_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
