use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::common::DecisionValue;

/// A stance on one measure, optionally annotated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureDecision {
    pub decision: DecisionValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Everything one visitor has decided about one ballot.
/// Saved wholesale: a save replaces every map, nothing is merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decisions {
    pub visitor_id: String,
    pub ballot_id: String,
    #[serde(default)]
    pub event_id: Option<String>,
    /// Measure ID to decision.
    pub measure_decisions: HashMap<String, MeasureDecision>,
    /// Race ID to selected candidate ID.
    pub candidate_selections: HashMap<String, String>,
    /// Any item ID to free text.
    pub notes: HashMap<String, String>,
    pub updated_at: DateTime<Utc>,
}
