//! Read-side queries over the stored collections.
//!
//! Filtering and aggregation run in application code so both backends
//! answer identically.

use serde::{Deserialize, Serialize};

use flightwatch_core::{Airline, Airport, Collection, DelayPolicy, DelayRecord, Flight};

use crate::backend::DocumentStore;
use crate::error::StoreError;
use crate::repo::load_records;

/// Filters for [`list_flights`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FlightQuery {
    /// Departure airport IATA code, compared case-insensitively.
    pub departure: Option<String>,
    /// Minimum delay in minutes (inclusive). Flights without a delay are excluded.
    pub min_delay: Option<i64>,
}

impl FlightQuery {
    pub fn matches(&self, flight: &Flight) -> bool {
        if let Some(dep) = &self.departure {
            if !flight.departure_airport.eq_ignore_ascii_case(dep.trim()) {
                return false;
            }
        }
        if let Some(min) = self.min_delay {
            match flight.delay_minutes {
                Some(delay) if delay >= min => {}
                _ => return false,
            }
        }
        true
    }
}

/// Aggregate delay figures over the flights collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DelayStats {
    /// Mean over flights that have a delay value; `None` when there are none.
    pub average_delay: Option<f64>,
    pub max_delay: Option<i64>,
    /// Flights at or above the delay threshold.
    pub delayed_flights: u64,
    pub threshold_minutes: i64,
    pub flights_with_delay: u64,
    pub total_flights: u64,
}

impl DelayStats {
    pub fn compute(flights: &[Flight], policy: DelayPolicy) -> Self {
        let delays: Vec<i64> = flights.iter().filter_map(|f| f.delay_minutes).collect();
        let average_delay = if delays.is_empty() {
            None
        } else {
            Some(delays.iter().sum::<i64>() as f64 / delays.len() as f64)
        };
        Self {
            average_delay,
            max_delay: delays.iter().copied().max(),
            delayed_flights: delays.iter().filter(|d| policy.is_delayed(**d)).count() as u64,
            threshold_minutes: policy.threshold_minutes,
            flights_with_delay: delays.len() as u64,
            total_flights: flights.len() as u64,
        }
    }
}

/// Document counts per collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct CollectionTotals {
    pub airports: u64,
    pub airlines: u64,
    pub flights: u64,
    pub delays: u64,
}

pub async fn list_flights(
    store: &dyn DocumentStore,
    query: &FlightQuery,
) -> Result<Vec<Flight>, StoreError> {
    let flights: Vec<Flight> = load_records(store).await?;
    Ok(flights.into_iter().filter(|f| query.matches(f)).collect())
}

pub async fn list_airports(store: &dyn DocumentStore) -> Result<Vec<Airport>, StoreError> {
    load_records(store).await
}

pub async fn list_airlines(store: &dyn DocumentStore) -> Result<Vec<Airline>, StoreError> {
    load_records(store).await
}

pub async fn list_delays(store: &dyn DocumentStore) -> Result<Vec<DelayRecord>, StoreError> {
    load_records(store).await
}

pub async fn delay_stats(
    store: &dyn DocumentStore,
    policy: DelayPolicy,
) -> Result<DelayStats, StoreError> {
    let flights: Vec<Flight> = load_records(store).await?;
    Ok(DelayStats::compute(&flights, policy))
}

pub async fn collection_totals(store: &dyn DocumentStore) -> Result<CollectionTotals, StoreError> {
    Ok(CollectionTotals {
        airports: store.count(Collection::Airports).await?,
        airlines: store.count(Collection::Airlines).await?,
        flights: store.count(Collection::Flights).await?,
        delays: store.count(Collection::Delays).await?,
    })
}
