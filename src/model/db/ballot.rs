use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::common::ballot_id;

use super::{BallotMeasure, Candidate, ElectionEvent, Endorsement, Location, Race, RaceCandidate};

/// Everything on the ballot for one ZIP code, freshly assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ballot {
    #[serde(flatten)]
    pub location: Location,
    /// Races in district fetch order.
    pub races: Vec<BallotRace>,
    /// State-wide measures.
    pub ballot_measures: Vec<BallotMeasure>,
}

/// A race together with its candidates, in join-table order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotRace {
    #[serde(flatten)]
    pub race: Race,
    pub candidates: Vec<BallotCandidate>,
}

/// A candidate as they appear in one race: the per-race join data plus
/// their endorsements in storage order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub primary_votes: Option<i64>,
    pub percentage: Option<f64>,
    pub is_won_primary: Option<bool>,
    pub endorsements: Vec<Endorsement>,
}

impl BallotCandidate {
    pub fn new(candidate: Candidate, link: RaceCandidate, endorsements: Vec<Endorsement>) -> Self {
        Self {
            candidate,
            primary_votes: link.primary_votes,
            percentage: link.percentage,
            is_won_primary: link.is_won_primary,
            endorsements,
        }
    }
}

/// A ballot as cached for a ZIP code within an election event.
/// Written once per (zipcode, event) and never overwritten by later assemblies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBallot {
    /// Derived from the ZIP code and event ID.
    pub id: String,
    pub event_id: String,
    #[serde(flatten)]
    pub location: Location,
    pub election_date: NaiveDate,
    pub election_type: String,
    pub race_ids: Vec<String>,
    pub measure_ids: Vec<String>,
    pub races: Vec<BallotRace>,
    pub measures: Vec<BallotMeasure>,
    /// Every distinct candidate across all races.
    pub candidates: Vec<Candidate>,
    pub race_count: u32,
    pub measure_count: u32,
    pub candidate_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredBallot {
    /// Denormalise an assembled ballot for storage under the given event.
    pub fn new(ballot: &Ballot, event: &ElectionEvent, now: DateTime<Utc>) -> Self {
        let mut seen = HashSet::new();
        let candidates: Vec<Candidate> = ballot
            .races
            .iter()
            .flat_map(|race| race.candidates.iter())
            .filter(|c| seen.insert(c.candidate.id.clone()))
            .map(|c| c.candidate.clone())
            .collect();

        Self {
            id: ballot_id(&ballot.location.zipcode, &event.id),
            event_id: event.id.clone(),
            location: ballot.location.clone(),
            election_date: event.election_date,
            election_type: event.event_type.clone(),
            race_ids: ballot.races.iter().map(|r| r.race.id.clone()).collect(),
            measure_ids: ballot.ballot_measures.iter().map(|m| m.id.clone()).collect(),
            races: ballot.races.clone(),
            measures: ballot.ballot_measures.clone(),
            race_count: count(ballot.races.len()),
            measure_count: count(ballot.ballot_measures.len()),
            candidate_count: count(candidates.len()),
            candidates,
            created_at: now,
            updated_at: now,
        }
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Admin-side filter over cached ballots.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromForm)]
pub struct BallotFilter {
    #[field(name = "eventId")]
    pub event_id: Option<String>,
    pub state: Option<String>,
}

impl BallotFilter {
    pub fn matches(&self, ballot: &StoredBallot) -> bool {
        self.event_id.as_ref().map_or(true, |id| *id == ballot.event_id)
            && self
                .state
                .as_ref()
                .map_or(true, |state| *state == ballot.location.state)
    }
}
