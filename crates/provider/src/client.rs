//! Flight data provider trait and request types.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use flightwatch_core::config::ProviderConfig;

use crate::error::ProviderError;

/// Provider resources fetched by the ingestion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Airports,
    Airlines,
    Flights,
}

impl Endpoint {
    /// Path segment below the provider base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Airports => "airports",
            Endpoint::Airlines => "airlines",
            Endpoint::Flights => "flights",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// One bounded page request against a provider endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchRequest {
    pub endpoint: Endpoint,
    pub limit: u32,
    /// Entity-specific filters such as `country_code` or `dep_iata`.
    pub filters: Vec<(String, String)>,
}

impl FetchRequest {
    pub fn airports(config: &ProviderConfig) -> Self {
        Self {
            endpoint: Endpoint::Airports,
            limit: config.airport_limit,
            filters: country_filter(&config.airport_country),
        }
    }

    pub fn airlines(config: &ProviderConfig) -> Self {
        Self {
            endpoint: Endpoint::Airlines,
            limit: config.airline_limit,
            filters: country_filter(&config.airline_country),
        }
    }

    pub fn flights(config: &ProviderConfig) -> Self {
        let filters = if config.flight_departures.is_empty() {
            Vec::new()
        } else {
            vec![("dep_iata".to_string(), config.flight_departures.join(","))]
        };
        Self {
            endpoint: Endpoint::Flights,
            limit: config.flight_limit,
            filters,
        }
    }

    /// Query parameters excluding the credential.
    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 1);
        params.push(("limit".to_string(), self.limit.to_string()));
        params.extend(self.filters.iter().cloned());
        params
    }
}

fn country_filter(country: &str) -> Vec<(String, String)> {
    if country.is_empty() {
        Vec::new()
    } else {
        vec![("country_code".to_string(), country.to_string())]
    }
}

/// Trait for flight data sources.
///
/// Implementations return the raw `data` entries of a single page; mapping
/// to the stored schema happens in [`crate::normalize`] so a malformed entry
/// can be dropped without losing the rest of the page.
#[async_trait]
pub trait FlightDataProvider: Send + Sync {
    /// Fetch one page of records for `request`.
    async fn fetch_page(
        &self,
        request: &FetchRequest,
    ) -> Result<Vec<serde_json::Value>, ProviderError>;

    /// Provider name for logs.
    fn name(&self) -> &str;
}
