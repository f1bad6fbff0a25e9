use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{
    common::{ballot_id, is_pilot_state},
    db::{Ballot, BallotCandidate, ElectionEvent, Location, Race},
};

/// The ballot for a ZIP code, plus the keys decisions should be saved under
/// when an election event is active for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotResponse {
    #[serde(flatten)]
    pub ballot: Ballot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ballot_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

impl BallotResponse {
    pub fn new(ballot: Ballot, event: Option<&ElectionEvent>) -> Self {
        Self {
            ballot_id: event.map(|event| ballot_id(&ballot.location.zipcode, &event.id)),
            event_id: event.map(|event| event.id.clone()),
            ballot,
        }
    }
}

/// Where a ZIP code is, and whether the guide covers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationLookup {
    pub state: String,
    pub county: String,
    pub city: String,
    pub supported: bool,
}

impl From<Location> for LocationLookup {
    fn from(location: Location) -> Self {
        Self {
            supported: is_pilot_state(&location.state),
            state: location.state,
            county: location.county,
            city: location.city,
        }
    }
}

/// Every race in a state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRaces {
    pub state: String,
    pub races: Vec<Race>,
}

/// One race and the candidates running in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceCandidates {
    pub race: Race,
    pub candidates: Vec<BallotCandidate>,
}

/// An admin correction to a cached ballot's election details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotUpdate {
    pub id: String,
    #[serde(default)]
    pub election_date: Option<NaiveDate>,
    #[serde(default)]
    pub election_type: Option<String>,
}
