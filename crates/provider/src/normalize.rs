//! Map provider records onto the stored schema.
//!
//! A record that lacks a required field is rejected as a whole; nothing is
//! partially stored. [`normalize_batch`] keeps the good records of a page
//! and reports the rest.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use flightwatch_core::delay::delay_minutes;
use flightwatch_core::model::{Airline, Airport, Flight};

use crate::error::NormalizeError;
use crate::wire::{NumberOrText, RawAirline, RawAirport, RawFlight};

/// Parse an ISO-8601 instant. A trailing `Z` means UTC; a value without
/// any offset is taken as UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let trimmed = value.trim();
    let normalized = match trimmed.strip_suffix('Z') {
        Some(rest) => format!("{rest}+00:00"),
        None => trimmed.to_string(),
    };
    match DateTime::parse_from_rfc3339(&normalized) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(e) => NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|_| e),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn required(value: Option<String>, field: &'static str) -> Result<String, NormalizeError> {
    non_blank(value).ok_or(NormalizeError::MissingField(field))
}

fn timestamp(value: String, field: &'static str) -> Result<DateTime<Utc>, NormalizeError> {
    parse_timestamp(&value).map_err(|_| NormalizeError::InvalidTimestamp { field, value })
}

/// Coordinates default to 0.0 when absent; unparseable text rejects the record.
fn coordinate(value: Option<NumberOrText>, field: &'static str) -> Result<f64, NormalizeError> {
    match value {
        None => Ok(0.0),
        Some(NumberOrText::Number(n)) => Ok(n),
        Some(NumberOrText::Text(s)) if s.trim().is_empty() => Ok(0.0),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or(NormalizeError::InvalidNumber { field, value: s }),
        Some(NumberOrText::Other(Value::Null)) => Ok(0.0),
        Some(NumberOrText::Other(other)) => Err(NormalizeError::InvalidNumber {
            field,
            value: other.to_string(),
        }),
    }
}

fn count(value: Option<NumberOrText>) -> Option<u32> {
    let n = match value? {
        NumberOrText::Number(n) => n,
        NumberOrText::Text(s) => s.trim().parse::<f64>().ok()?,
        NumberOrText::Other(_) => return None,
    };
    (n.is_finite() && n >= 0.0 && n <= u32::MAX as f64).then(|| n as u32)
}

pub fn normalize_airport(value: &Value) -> Result<Airport, NormalizeError> {
    let raw = RawAirport::deserialize(value)?;
    Ok(Airport {
        iata_code: required(raw.iata_code, "iata_code")?,
        icao_code: non_blank(raw.icao_code),
        name: non_blank(raw.airport_name),
        city: non_blank(raw.city).or_else(|| non_blank(raw.city_name)),
        country: non_blank(raw.country_name),
        latitude: coordinate(raw.latitude, "latitude")?,
        longitude: coordinate(raw.longitude, "longitude")?,
        timezone: non_blank(raw.timezone),
    })
}

pub fn normalize_airline(value: &Value) -> Result<Airline, NormalizeError> {
    let raw = RawAirline::deserialize(value)?;
    Ok(Airline {
        iata_code: required(raw.iata_code, "iata_code")?,
        icao_code: non_blank(raw.icao_code),
        name: non_blank(raw.airline_name),
        country: non_blank(raw.country_name),
        fleet_size: count(raw.fleet_size),
        status: non_blank(raw.status),
    })
}

/// Map a provider flight. `observed_at` becomes `last_updated`.
pub fn normalize_flight(value: &Value, observed_at: DateTime<Utc>) -> Result<Flight, NormalizeError> {
    let raw = RawFlight::deserialize(value)?;

    let ident = raw.flight.ok_or(NormalizeError::MissingField("flight"))?;
    let airline = raw.airline.ok_or(NormalizeError::MissingField("airline"))?;
    let departure = raw.departure.ok_or(NormalizeError::MissingField("departure"))?;
    let arrival = raw.arrival.ok_or(NormalizeError::MissingField("arrival"))?;

    let flight_number = required(ident.iata, "flight.iata")?;
    let airline_code = required(airline.iata, "airline.iata")?;
    let departure_airport = required(departure.iata, "departure.iata")?;
    let arrival_airport = required(arrival.iata, "arrival.iata")?;
    let scheduled_departure = timestamp(
        required(departure.scheduled, "departure.scheduled")?,
        "departure.scheduled",
    )?;
    let actual_departure = non_blank(departure.actual)
        .map(|s| timestamp(s, "departure.actual"))
        .transpose()?;
    let status = required(raw.flight_status, "flight_status")?;

    Ok(Flight {
        flight_number,
        airline: airline_code,
        airline_name: non_blank(airline.name),
        departure_airport,
        arrival_airport,
        scheduled_departure,
        actual_departure,
        status,
        delay_minutes: delay_minutes(scheduled_departure, actual_departure),
        last_updated: observed_at,
    })
}

/// Normalize a page, separating successes from failures.
///
/// Returns `(records, errors)` where each error carries the record's index
/// in the page. Good records are never blocked by bad ones.
pub fn normalize_batch<T, F>(
    entity: &str,
    values: &[Value],
    normalize: F,
) -> (Vec<T>, Vec<(usize, NormalizeError)>)
where
    F: Fn(&Value) -> Result<T, NormalizeError>,
{
    let mut records = Vec::with_capacity(values.len());
    let mut errors = Vec::new();

    for (index, value) in values.iter().enumerate() {
        match normalize(value) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(entity = %entity, index, error = %e, "skipping provider record");
                errors.push((index, e));
            }
        }
    }

    (records, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn observed() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 13, 0, 0).unwrap()
    }

    fn flight_json(actual: Option<&str>) -> Value {
        json!({
            "flight_date": "2024-01-01",
            "flight_status": "active",
            "departure": {
                "airport": "Frankfurt International",
                "iata": "FRA",
                "scheduled": "2024-01-01T10:00:00Z",
                "actual": actual
            },
            "arrival": { "iata": "JFK", "scheduled": "2024-01-01T18:00:00+00:00" },
            "airline": { "name": "Lufthansa", "iata": "LH", "icao": "DLH" },
            "flight": { "number": "400", "iata": "LH400", "icao": "DLH400" }
        })
    }

    #[test]
    fn z_suffix_is_utc() {
        let ts = parse_timestamp("2024-01-01T10:00:00Z").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn offsets_are_converted_to_utc() {
        let ts = parse_timestamp("2024-01-01T12:00:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn naive_timestamp_is_utc() {
        let ts = parse_timestamp("2024-01-01T10:00:00.000").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn garbage_timestamp_fails() {
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn flight_with_actual_gets_delay() {
        let f = normalize_flight(&flight_json(Some("2024-01-01T12:05:00Z")), observed()).unwrap();
        assert_eq!(f.flight_number, "LH400");
        assert_eq!(f.airline, "LH");
        assert_eq!(f.airline_name.as_deref(), Some("Lufthansa"));
        assert_eq!(f.departure_airport, "FRA");
        assert_eq!(f.arrival_airport, "JFK");
        assert_eq!(f.status, "active");
        assert_eq!(f.delay_minutes, Some(125));
        assert_eq!(f.last_updated, observed());
    }

    #[test]
    fn flight_without_actual_has_null_delay() {
        let f = normalize_flight(&flight_json(None), observed()).unwrap();
        assert_eq!(f.actual_departure, None);
        assert_eq!(f.delay_minutes, None);
    }

    #[test]
    fn flight_missing_number_is_rejected() {
        let mut value = flight_json(None);
        value["flight"]["iata"] = Value::Null;
        let err = normalize_flight(&value, observed()).unwrap_err();
        assert!(matches!(err, NormalizeError::MissingField("flight.iata")));
    }

    #[test]
    fn flight_missing_nested_object_is_rejected() {
        let mut value = flight_json(None);
        value.as_object_mut().unwrap().remove("arrival");
        let err = normalize_flight(&value, observed()).unwrap_err();
        assert!(matches!(err, NormalizeError::MissingField("arrival")));
    }

    #[test]
    fn flight_with_bad_actual_is_rejected() {
        let err = normalize_flight(&flight_json(Some("soon")), observed()).unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::InvalidTimestamp { field: "departure.actual", .. }
        ));
    }

    #[test]
    fn flight_with_wrong_types_is_malformed() {
        let value = json!({ "flight": "LH400" });
        let err = normalize_flight(&value, observed()).unwrap_err();
        assert!(matches!(err, NormalizeError::Malformed(_)));
    }

    #[test]
    fn airport_parses_string_coordinates() {
        let value = json!({
            "airport_name": "Frankfurt International Airport",
            "iata_code": "FRA",
            "icao_code": "EDDF",
            "latitude": "50.033333",
            "longitude": "8.570556",
            "timezone": "Europe/Berlin",
            "country_name": "Germany",
            "city": "Frankfurt"
        });
        let a = normalize_airport(&value).unwrap();
        assert_eq!(a.iata_code, "FRA");
        assert_eq!(a.icao_code.as_deref(), Some("EDDF"));
        assert!((a.latitude - 50.033333).abs() < 1e-9);
        assert_eq!(a.city.as_deref(), Some("Frankfurt"));
        assert_eq!(a.timezone.as_deref(), Some("Europe/Berlin"));
    }

    #[test]
    fn airport_without_iata_is_rejected() {
        let value = json!({ "airport_name": "Nowhere", "iata_code": "" });
        assert!(matches!(
            normalize_airport(&value).unwrap_err(),
            NormalizeError::MissingField("iata_code")
        ));
    }

    #[test]
    fn airport_missing_coordinates_default_to_zero() {
        let a = normalize_airport(&json!({ "iata_code": "HAM" })).unwrap();
        assert_eq!((a.latitude, a.longitude), (0.0, 0.0));
        assert!(a.name.is_none());
    }

    #[test]
    fn airport_with_unparseable_coordinate_is_rejected() {
        let value = json!({ "iata_code": "HAM", "latitude": "north" });
        assert!(matches!(
            normalize_airport(&value).unwrap_err(),
            NormalizeError::InvalidNumber { field: "latitude", .. }
        ));
    }

    #[test]
    fn airline_fleet_size_from_text() {
        let value = json!({
            "airline_name": "Lufthansa",
            "iata_code": "LH",
            "icao_code": "DLH",
            "country_name": "Germany",
            "fleet_size": "315",
            "status": "active"
        });
        let a = normalize_airline(&value).unwrap();
        assert_eq!(a.fleet_size, Some(315));
        assert_eq!(a.status.as_deref(), Some("active"));
    }

    #[test]
    fn airline_bad_fleet_size_is_dropped_not_fatal() {
        let value = json!({ "iata_code": "EW", "fleet_size": "n/a" });
        let a = normalize_airline(&value).unwrap();
        assert_eq!(a.fleet_size, None);
    }

    #[test]
    fn airline_non_numeric_fleet_size_keeps_record() {
        let value = json!({ "iata_code": "EW", "fleet_size": true, "status": "active" });
        let a = normalize_airline(&value).unwrap();
        assert_eq!(a.iata_code, "EW");
        assert_eq!(a.fleet_size, None);
    }

    #[test]
    fn airport_with_both_city_keys_prefers_city() {
        let value = json!({ "iata_code": "FRA", "city": "Frankfurt", "city_name": "FRA" });
        let a = normalize_airport(&value).unwrap();
        assert_eq!(a.city.as_deref(), Some("Frankfurt"));

        let value = json!({ "iata_code": "MUC", "city_name": "Munich" });
        let a = normalize_airport(&value).unwrap();
        assert_eq!(a.city.as_deref(), Some("Munich"));
    }

    #[test]
    fn batch_keeps_good_records() {
        let values = vec![
            json!({ "iata_code": "FRA" }),
            json!({ "airport_name": "no code" }),
            json!({ "iata_code": "MUC" }),
            json!("not an object"),
        ];
        let (airports, errors) = normalize_batch("airports", &values, normalize_airport);
        assert_eq!(airports.len(), 2);
        assert_eq!(airports[1].iata_code, "MUC");
        let indexes: Vec<usize> = errors.iter().map(|(i, _)| *i).collect();
        assert_eq!(indexes, vec![1, 3]);
    }
}
