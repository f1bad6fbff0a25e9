use serde::{Deserialize, Serialize};

/// Reference data for a single ZIP code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Five-digit ZIP code, unique.
    pub zipcode: String,
    /// Two-letter state code.
    pub state: String,
    pub county: String,
    pub city: String,
}

/// Link between a ZIP code and one electoral district it overlaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZipDistrict {
    pub zipcode: String,
    pub district_id: String,
}
