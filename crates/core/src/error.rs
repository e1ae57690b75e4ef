use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlightwatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid {collection} record: {reason}")]
    InvalidRecord {
        collection: &'static str,
        reason: String,
    },
}
