//! AviationStack response shapes.
//!
//! Every field is optional here; which ones are required is decided in
//! [`crate::normalize`].

use serde::Deserialize;

/// Top-level page envelope.
#[derive(Debug, Deserialize)]
pub struct PageEnvelope {
    #[serde(default)]
    pub data: Vec<serde_json::Value>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    /// Present when the provider reports a failure with a 200 status.
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub count: Option<u64>,
    pub total: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The provider sends coordinates and fleet sizes either as JSON numbers
/// or as numeric strings. Anything else lands in `Other` so one odd field
/// does not fail the whole record.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize)]
pub struct RawAirport {
    pub airport_name: Option<String>,
    pub iata_code: Option<String>,
    pub icao_code: Option<String>,
    pub country_name: Option<String>,
    pub city: Option<String>,
    /// Fallback when `city` is absent.
    pub city_name: Option<String>,
    pub latitude: Option<NumberOrText>,
    pub longitude: Option<NumberOrText>,
    pub timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawAirline {
    pub airline_name: Option<String>,
    pub iata_code: Option<String>,
    pub icao_code: Option<String>,
    pub country_name: Option<String>,
    pub fleet_size: Option<NumberOrText>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawFlight {
    pub flight_status: Option<String>,
    pub flight: Option<RawFlightIdent>,
    pub airline: Option<RawAirlineRef>,
    pub departure: Option<RawEndpoint>,
    pub arrival: Option<RawEndpoint>,
}

#[derive(Debug, Deserialize)]
pub struct RawFlightIdent {
    pub iata: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawAirlineRef {
    pub name: Option<String>,
    pub iata: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawEndpoint {
    pub iata: Option<String>,
    pub scheduled: Option<String>,
    pub actual: Option<String>,
}
