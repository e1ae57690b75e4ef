//! Liveness and poller status.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use flightwatch_ingest::CycleReport;
use flightwatch_store::query::{self, CollectionTotals};

use super::{store_unavailable, ApiResult};
use crate::state::AppState;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store_backend: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Server is up", body = HealthResponse))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store_backend: state.store.backend_name().to_string(),
    })
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct StatusResponse {
    pub polling: bool,
    pub delay_threshold_minutes: i64,
    pub totals: CollectionTotals,
    /// `None` until the first cycle completes.
    pub last_cycle: Option<CycleReport>,
    #[schema(value_type = Object)]
    pub config: serde_json::Value,
}

#[utoipa::path(
    get,
    path = "/status",
    tag = "Health",
    responses(
        (status = 200, description = "Collection totals and the latest polling cycle", body = StatusResponse),
        (status = 503, description = "Store unavailable", body = super::ErrorResponse),
    )
)]
pub async fn status(State(state): State<Arc<AppState>>) -> ApiResult<StatusResponse> {
    let totals = query::collection_totals(state.store.as_ref())
        .await
        .map_err(store_unavailable)?;
    let last_cycle = state.last_report.read().await.clone();
    Ok(Json(StatusResponse {
        polling: state.polling,
        delay_threshold_minutes: state.policy.threshold_minutes,
        totals,
        last_cycle,
        config: state.config_summary.clone(),
    }))
}
