//! Read-only query endpoints.

pub mod doc;
mod health;
mod records;

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::warn;

use flightwatch_store::StoreError;

#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

pub(crate) type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

/// Store failures surface as 503; the next poll cycle may recover them.
pub(crate) fn store_unavailable(e: StoreError) -> (StatusCode, Json<ErrorResponse>) {
    warn!(error = %e, "store read failed");
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

pub use health::{health, status};
pub use records::{airlines, airports, delay_stats, delays, flights};
