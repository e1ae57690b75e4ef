use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use flightwatch_core::{Airline, Airport, DelayRecord, Flight};
use flightwatch_store::query::{self, DelayStats, FlightQuery};

use super::{store_unavailable, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FlightsParams {
    /// Departure airport IATA code (case-insensitive).
    pub departure: Option<String>,
    /// Minimum delay in minutes, inclusive. Flights without a delay are excluded.
    pub min_delay: Option<i64>,
}

impl From<FlightsParams> for FlightQuery {
    fn from(p: FlightsParams) -> Self {
        FlightQuery {
            departure: p.departure.filter(|d| !d.trim().is_empty()),
            min_delay: p.min_delay,
        }
    }
}

#[utoipa::path(
    get,
    path = "/flights",
    tag = "Flights",
    params(FlightsParams),
    responses(
        (status = 200, description = "Stored flights matching the filters", body = Vec<Flight>),
        (status = 503, description = "Store unavailable", body = super::ErrorResponse),
    )
)]
pub async fn flights(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FlightsParams>,
) -> ApiResult<Vec<Flight>> {
    let filter = FlightQuery::from(params);
    query::list_flights(state.store.as_ref(), &filter)
        .await
        .map(Json)
        .map_err(store_unavailable)
}

#[utoipa::path(
    get,
    path = "/airports",
    tag = "Reference Data",
    responses(
        (status = 200, description = "All stored airports", body = Vec<Airport>),
        (status = 503, description = "Store unavailable", body = super::ErrorResponse),
    )
)]
pub async fn airports(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Airport>> {
    query::list_airports(state.store.as_ref())
        .await
        .map(Json)
        .map_err(store_unavailable)
}

#[utoipa::path(
    get,
    path = "/airlines",
    tag = "Reference Data",
    responses(
        (status = 200, description = "All stored airlines", body = Vec<Airline>),
        (status = 503, description = "Store unavailable", body = super::ErrorResponse),
    )
)]
pub async fn airlines(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Airline>> {
    query::list_airlines(state.store.as_ref())
        .await
        .map(Json)
        .map_err(store_unavailable)
}

#[utoipa::path(
    get,
    path = "/delays",
    tag = "Delays",
    responses(
        (status = 200, description = "Flights at or over the delay threshold", body = Vec<DelayRecord>),
        (status = 503, description = "Store unavailable", body = super::ErrorResponse),
    )
)]
pub async fn delays(State(state): State<Arc<AppState>>) -> ApiResult<Vec<DelayRecord>> {
    query::list_delays(state.store.as_ref())
        .await
        .map(Json)
        .map_err(store_unavailable)
}

#[utoipa::path(
    get,
    path = "/delay-stats",
    tag = "Delays",
    responses(
        (status = 200, description = "Mean and maximum delay, count of delayed flights", body = DelayStats),
        (status = 503, description = "Store unavailable", body = super::ErrorResponse),
    )
)]
pub async fn delay_stats(State(state): State<Arc<AppState>>) -> ApiResult<DelayStats> {
    query::delay_stats(state.store.as_ref(), state.policy)
        .await
        .map(Json)
        .map_err(store_unavailable)
}
