use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::db::{Decisions, MeasureDecision};

/// A full set of decisions for one ballot. Saving it replaces whatever was
/// saved before for the same visitor and ballot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionsRequest {
    pub visitor_id: String,
    pub ballot_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    pub measure_decisions: HashMap<String, MeasureDecision>,
    pub candidate_selections: HashMap<String, String>,
    #[serde(default)]
    pub notes: HashMap<String, String>,
}

impl DecisionsRequest {
    pub fn into_decisions(self, updated_at: DateTime<Utc>) -> Decisions {
        Decisions {
            visitor_id: self.visitor_id,
            ballot_id: self.ballot_id,
            event_id: self.event_id,
            measure_decisions: self.measure_decisions,
            candidate_selections: self.candidate_selections,
            notes: self.notes,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rocket::serde::json::{json, serde_json};

    use crate::model::common::DecisionValue;

    #[test]
    fn shape() {
        let request: DecisionsRequest = serde_json::from_value(json!({
            "visitorId": "v",
            "ballotId": "b",
            "measureDecisions": {"m1": {"decision": "undecided", "note": "ask around"}},
            "candidateSelections": {"r1": "c1"},
        }))
        .unwrap();
        assert!(request.notes.is_empty());
        assert_eq!(
            request.measure_decisions["m1"].decision,
            DecisionValue::Undecided
        );

        for bad in [
            json!({"visitorId": "v", "ballotId": "b", "measureDecisions": {"m1": {"decision": "maybe"}}, "candidateSelections": {}}),
            json!({"visitorId": "v", "ballotId": "b", "measureDecisions": {}}),
            json!({"visitorId": "v", "measureDecisions": {}, "candidateSelections": {}}),
        ] {
            assert!(serde_json::from_value::<DecisionsRequest>(bad).is_err());
        }
    }
}
