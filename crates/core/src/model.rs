use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::collection::Collection;
use crate::error::FlightwatchError;

/// A document stored under a natural key in one of the [`Collection`]s.
///
/// Every write replaces the whole document for its key; there is no
/// field-level merge.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;

    /// Natural identifier (IATA code or flight number).
    fn key(&self) -> &str;

    /// Return the key, rejecting blank identifiers.
    fn checked_key(&self) -> Result<&str, FlightwatchError> {
        let key = self.key();
        if key.trim().is_empty() {
            return Err(FlightwatchError::InvalidRecord {
                collection: Self::COLLECTION.as_str(),
                reason: "natural key is empty".to_string(),
            });
        }
        Ok(key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Airport {
    pub iata_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icao_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Record for Airport {
    const COLLECTION: Collection = Collection::Airports;

    fn key(&self) -> &str {
        &self.iata_code
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Airline {
    pub iata_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icao_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fleet_size: Option<u32>,
    /// Operational status as reported by the provider ("active", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Record for Airline {
    const COLLECTION: Collection = Collection::Airlines;

    fn key(&self) -> &str {
        &self.iata_code
    }
}

/// A flight keyed by flight number.
///
/// The same flight number on different days maps to the same document;
/// the most recent poll wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Flight {
    pub flight_number: String,
    /// Airline IATA code.
    pub airline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airline_name: Option<String>,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub scheduled_departure: DateTime<Utc>,
    #[serde(default)]
    pub actual_departure: Option<DateTime<Utc>>,
    /// Free-text provider status: scheduled, active, landed, cancelled, ...
    pub status: String,
    /// Signed; negative for early departures, `None` without an actual departure.
    #[serde(default)]
    pub delay_minutes: Option<i64>,
    pub last_updated: DateTime<Utc>,
}

impl Record for Flight {
    const COLLECTION: Collection = Collection::Flights;

    fn key(&self) -> &str {
        &self.flight_number
    }
}

/// Copy of a flight whose delay met the delay threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DelayRecord {
    pub flight_number: String,
    pub airline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airline_name: Option<String>,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub scheduled_departure: DateTime<Utc>,
    pub actual_departure: DateTime<Utc>,
    pub status: String,
    pub delay_minutes: i64,
    pub last_updated: DateTime<Utc>,
}

impl DelayRecord {
    pub fn from_flight(flight: &Flight, actual_departure: DateTime<Utc>, delay_minutes: i64) -> Self {
        Self {
            flight_number: flight.flight_number.clone(),
            airline: flight.airline.clone(),
            airline_name: flight.airline_name.clone(),
            departure_airport: flight.departure_airport.clone(),
            arrival_airport: flight.arrival_airport.clone(),
            scheduled_departure: flight.scheduled_departure,
            actual_departure,
            status: flight.status.clone(),
            delay_minutes,
            last_updated: flight.last_updated,
        }
    }
}

impl Record for DelayRecord {
    const COLLECTION: Collection = Collection::Delays;

    fn key(&self) -> &str {
        &self.flight_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn flight() -> Flight {
        Flight {
            flight_number: "LH400".to_string(),
            airline: "LH".to_string(),
            airline_name: Some("Lufthansa".to_string()),
            departure_airport: "FRA".to_string(),
            arrival_airport: "JFK".to_string(),
            scheduled_departure: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
            actual_departure: None,
            status: "scheduled".to_string(),
            delay_minutes: None,
            last_updated: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn blank_key_is_rejected() {
        let mut f = flight();
        f.flight_number = "  ".to_string();
        let err = f.checked_key().unwrap_err();
        assert!(err.to_string().contains("flights"));
    }

    #[test]
    fn flight_without_actual_serializes_null_delay() {
        let json = serde_json::to_value(flight()).unwrap();
        assert!(json["delay_minutes"].is_null());
        assert!(json["actual_departure"].is_null());
        assert_eq!(json["flight_number"], "LH400");
    }

    #[test]
    fn airport_omits_missing_optional_fields() {
        let airport = Airport {
            iata_code: "MUC".to_string(),
            icao_code: None,
            name: Some("Munich".to_string()),
            city: None,
            country: Some("Germany".to_string()),
            latitude: 48.35,
            longitude: 11.78,
            timezone: None,
        };
        let json = serde_json::to_value(&airport).unwrap();
        assert!(json.get("icao_code").is_none());
        assert!(json.get("city").is_none());
        let back: Airport = serde_json::from_value(json).unwrap();
        assert_eq!(back, airport);
    }

    #[test]
    fn delay_record_copies_flight_fields() {
        let f = flight();
        let actual = Utc.with_ymd_and_hms(2024, 1, 1, 12, 5, 0).unwrap();
        let rec = DelayRecord::from_flight(&f, actual, 125);
        assert_eq!(rec.key(), "LH400");
        assert_eq!(rec.departure_airport, "FRA");
        assert_eq!(rec.actual_departure, actual);
        assert_eq!(rec.delay_minutes, 125);
    }
}
