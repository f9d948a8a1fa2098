//! Geographic location results

use serde::{Deserialize, Serialize};

/// Most specific geographic level resolved for a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSpecificity {
    City,
    Province,
    Country,
    Unknown,
}

/// Content-derived location of a document
///
/// Only entities found in the text count; the publisher's own location is
/// never considered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Two-letter province code (e.g. `ON`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    /// `canada`, `united_states`, or `unknown`
    pub country: String,
    pub specificity: LocationSpecificity,
    pub confidence: f32,
}

impl LocationResult {
    /// Unresolved location with the given confidence (0.5 for ambiguous
    /// competition, 0.0 when extraction produced nothing or failed)
    pub fn unknown(confidence: f32) -> Self {
        Self {
            city: None,
            province: None,
            country: "unknown".to_string(),
            specificity: LocationSpecificity::Unknown,
            confidence,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.country != "unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_location() {
        let loc = LocationResult::unknown(0.5);
        assert_eq!(loc.country, "unknown");
        assert_eq!(loc.specificity, LocationSpecificity::Unknown);
        assert!(!loc.is_resolved());
    }

    #[test]
    fn test_specificity_serde() {
        assert_eq!(
            serde_json::to_string(&LocationSpecificity::City).unwrap(),
            "\"city\""
        );
    }
}
