//! OpenAPI document, served via Scalar UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "flightwatch API",
        version = "0.1.0",
        description = "Read-only access to polled airports, airlines, flights and derived delays.",
    ),
    tags(
        (name = "Flights", description = "Stored flights with optional departure and delay filters"),
        (name = "Reference Data", description = "Airports and airlines"),
        (name = "Delays", description = "Delay records and aggregate statistics"),
        (name = "Health", description = "Liveness and poller status"),
    ),
    paths(
        crate::api::records::flights,
        crate::api::records::airports,
        crate::api::records::airlines,
        crate::api::records::delays,
        crate::api::records::delay_stats,
        crate::api::health::health,
        crate::api::health::status,
    ),
    components(schemas(
        flightwatch_core::Flight,
        flightwatch_core::Airport,
        flightwatch_core::Airline,
        flightwatch_core::DelayRecord,
        flightwatch_core::Collection,
        flightwatch_store::DelayStats,
        flightwatch_store::CollectionTotals,
        flightwatch_ingest::CycleReport,
        flightwatch_ingest::EntityOutcome,
        flightwatch_ingest::EntityReport,
        flightwatch_ingest::DeriveReport,
        crate::api::ErrorResponse,
    ))
)]
pub struct ApiDoc;
