pub mod aviationstack;
pub mod client;
pub mod error;
pub mod normalize;
pub mod wire;

pub use aviationstack::AviationStackClient;
pub use client::{Endpoint, FetchRequest, FlightDataProvider};
pub use error::{NormalizeError, ProviderError};
pub use normalize::{
    normalize_airline, normalize_airport, normalize_batch, normalize_flight, parse_timestamp,
};
