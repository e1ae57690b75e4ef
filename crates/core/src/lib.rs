pub mod collection;
pub mod config;
pub mod delay;
pub mod error;
pub mod model;

pub use collection::*;
pub use config::Config;
pub use delay::{delay_minutes, DelayPolicy, DEFAULT_DELAY_THRESHOLD_MINUTES};
pub use error::*;
pub use model::*;
