//! Delay derivation and classification.
//!
//! This is the only place a delay figure is computed: normalization,
//! the delay deriver and the read-side statistics all go through
//! [`delay_minutes`] and [`DelayPolicy::is_delayed`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{DelayRecord, Flight};

pub const DEFAULT_DELAY_THRESHOLD_MINUTES: i64 = 120;

/// Whole minutes between scheduled and actual departure, truncated toward zero.
///
/// `None` when there is no actual departure. Early departures are negative.
pub fn delay_minutes(scheduled: DateTime<Utc>, actual: Option<DateTime<Utc>>) -> Option<i64> {
    actual.map(|actual| (actual - scheduled).num_minutes())
}

/// Threshold classification for the delays collection.
///
/// The boundary is inclusive: a delay equal to the threshold counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayPolicy {
    pub threshold_minutes: i64,
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self {
            threshold_minutes: DEFAULT_DELAY_THRESHOLD_MINUTES,
        }
    }
}

impl DelayPolicy {
    pub fn new(threshold_minutes: i64) -> Self {
        Self { threshold_minutes }
    }

    pub fn is_delayed(&self, minutes: i64) -> bool {
        minutes >= self.threshold_minutes
    }

    /// Build the delay record for `flight` if it qualifies.
    ///
    /// The delay is recomputed from the timestamps rather than trusted from
    /// the stored field.
    pub fn classify(&self, flight: &Flight) -> Option<DelayRecord> {
        let actual = flight.actual_departure?;
        let minutes = delay_minutes(flight.scheduled_departure, Some(actual))?;
        self.is_delayed(minutes)
            .then(|| DelayRecord::from_flight(flight, actual, minutes))
    }
}
