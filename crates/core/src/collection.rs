use serde::{Deserialize, Serialize};

/// The keyed collections held by the document store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Airports,
    Airlines,
    Flights,
    Delays,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Airports,
        Collection::Airlines,
        Collection::Flights,
        Collection::Delays,
    ];

    /// Stable name used as the storage discriminator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Airports => "airports",
            Collection::Airlines => "airlines",
            Collection::Flights => "flights",
            Collection::Delays => "delays",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_distinct() {
        let mut names: Vec<&str> = Collection::ALL.iter().map(|c| c.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Collection::ALL.len());
    }

    #[test]
    fn serde_uses_storage_name() {
        let json = serde_json::to_string(&Collection::Delays).unwrap();
        assert_eq!(json, "\"delays\"");
        assert_eq!(Collection::Flights.to_string(), "flights");
    }
}
