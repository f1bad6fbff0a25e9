use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Location;

/// Where an election event is in its own lifecycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

/// Who may see an election event.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

/// An administrator-defined voting occasion that ballots are cached against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionEvent {
    pub id: String,
    pub state: String,
    /// When set, the event only covers this county of the state.
    pub county: Option<String>,
    pub title: String,
    pub event_type: String,
    pub election_date: NaiveDate,
    pub registration_deadline: Option<NaiveDate>,
    pub description: Option<String>,
    pub status: EventStatus,
    pub visibility: Visibility,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when soft-deleted; deleted events are invisible everywhere but restore.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ElectionEvent {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Can this event be the active one for ballots at the given location?
    pub fn covers(&self, location: &Location) -> bool {
        self.status == EventStatus::Upcoming
            && self.visibility == Visibility::Public
            && !self.archived
            && !self.is_deleted()
            && self.state == location.state
            && self
                .county
                .as_ref()
                .map_or(true, |county| county.eq_ignore_ascii_case(&location.county))
    }
}
