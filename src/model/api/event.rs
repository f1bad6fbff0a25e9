use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::db::{ElectionEvent, EventStatus, Visibility};

fn upcoming() -> EventStatus {
    EventStatus::Upcoming
}

fn public() -> Visibility {
    Visibility::Public
}

/// An election event as submitted by an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSpec {
    pub state: String,
    #[serde(default)]
    pub county: Option<String>,
    pub title: String,
    pub event_type: String,
    pub election_date: NaiveDate,
    #[serde(default)]
    pub registration_deadline: Option<NaiveDate>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "upcoming")]
    pub status: EventStatus,
    #[serde(default = "public")]
    pub visibility: Visibility,
}

impl EventSpec {
    /// Convert this spec into a live, unarchived event.
    pub fn into_event(self, id: String, now: DateTime<Utc>) -> ElectionEvent {
        ElectionEvent {
            id,
            state: self.state,
            county: self.county.filter(|county| !county.trim().is_empty()),
            title: self.title,
            event_type: self.event_type,
            election_date: self.election_date,
            registration_deadline: self.registration_deadline,
            description: self.description,
            status: self.status,
            visibility: self.visibility,
            archived: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use rocket::serde::json::{json, serde_json};

    #[test]
    fn defaults_to_upcoming_public() {
        let spec: EventSpec = serde_json::from_value(json!({
            "state": "TX",
            "county": "",
            "title": "Texas general",
            "eventType": "general",
            "electionDate": "2026-11-03",
        }))
        .unwrap();
        assert_eq!(spec.status, EventStatus::Upcoming);
        assert_eq!(spec.visibility, Visibility::Public);

        let event = spec.into_event("e1".to_string(), Utc::now());
        assert_eq!(event.county, None);
        assert!(!event.archived);
        assert!(!event.is_deleted());
    }
}
