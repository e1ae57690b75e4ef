//! Polling cycle: fetch and normalize provider pages, upsert them, then
//! derive delay records from the stored flights.

pub mod deriver;
pub mod error;
pub mod pipeline;
pub mod poller;
pub mod report;

pub use deriver::DelayDeriver;
pub use error::IngestError;
pub use pipeline::IngestionPipeline;
pub use poller::{Poller, SharedReport};
pub use report::{CycleReport, DeriveReport, EntityOutcome, EntityReport};
