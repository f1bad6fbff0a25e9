//! The repository interface between the voter guide logic and its tables.

use std::ops::Deref;
use std::sync::Arc;

use log::error;
use rocket::{
    http::Status,
    request::{self, FromRequest, Request},
};

use crate::error::Result;
use crate::model::db::{
    AnalyticsEvent, BallotFilter, BallotMeasure, Candidate, Decisions, ElectionEvent, Endorsement,
    FinalizedVoterCard, Location, Race, RaceCandidate, StoredBallot, User,
};

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::{ensure_indexes_exist, MongoStore};

/// Every table the voter guide reads or writes.
///
/// Reads return rows in storage order; nothing here sorts.
#[rocket::async_trait]
pub trait Store: Send + Sync {
    // Reference data.
    async fn location(&self, zipcode: &str) -> Result<Option<Location>>;
    async fn district_ids(&self, zipcode: &str) -> Result<Vec<String>>;
    async fn races_in_district(&self, district_id: &str) -> Result<Vec<Race>>;
    async fn races_in_state(&self, state: &str) -> Result<Vec<Race>>;
    async fn race(&self, race_id: &str) -> Result<Option<Race>>;
    async fn race_candidates(&self, race_id: &str) -> Result<Vec<RaceCandidate>>;
    /// Batched lookup; unknown IDs are silently absent from the result.
    async fn candidates(&self, ids: &[String]) -> Result<Vec<Candidate>>;
    async fn endorsements(&self, candidate_id: &str) -> Result<Vec<Endorsement>>;
    async fn measures_in_state(&self, state: &str) -> Result<Vec<BallotMeasure>>;
    async fn measure(&self, measure_id: &str) -> Result<Option<BallotMeasure>>;

    // Cached ballots.
    /// Insert unless a ballot with the same ID exists. Returns whether it was inserted.
    async fn insert_ballot_once(&self, ballot: &StoredBallot) -> Result<bool>;
    async fn ballot(&self, id: &str) -> Result<Option<StoredBallot>>;
    async fn ballots(&self, filter: &BallotFilter) -> Result<Vec<StoredBallot>>;
    /// Returns whether a ballot with that ID existed.
    async fn replace_ballot(&self, ballot: &StoredBallot) -> Result<bool>;

    // Election events.
    /// Non-deleted events with the given archived flag.
    async fn events(&self, archived: bool) -> Result<Vec<ElectionEvent>>;
    /// Non-deleted events for a state.
    async fn events_in_state(&self, state: &str) -> Result<Vec<ElectionEvent>>;
    /// Includes soft-deleted events.
    async fn event(&self, id: &str) -> Result<Option<ElectionEvent>>;
    async fn insert_event(&self, event: &ElectionEvent) -> Result<()>;
    /// Returns whether an event with that ID existed.
    async fn replace_event(&self, event: &ElectionEvent) -> Result<bool>;

    // Decisions.
    /// Insert or wholesale replace the record for (visitor, ballot).
    async fn save_decisions(&self, decisions: &Decisions) -> Result<()>;
    async fn decisions(&self, visitor_id: &str, ballot_id: &str) -> Result<Option<Decisions>>;

    // Voter cards.
    async fn insert_card(&self, card: &FinalizedVoterCard) -> Result<()>;
    async fn card(&self, id: &str) -> Result<Option<FinalizedVoterCard>>;
    /// Returns whether a card with that ID existed.
    async fn replace_card(&self, card: &FinalizedVoterCard) -> Result<bool>;
    async fn public_cards(&self, visitor_id: &str) -> Result<Vec<FinalizedVoterCard>>;

    // Users.
    async fn user(&self, username: &str) -> Result<Option<User>>;
    /// Returns false if the username is already taken.
    async fn insert_user(&self, user: &User) -> Result<bool>;

    // Analytics.
    async fn record(&self, event: &AnalyticsEvent) -> Result<()>;
}

/// A shareable handle on the configured store.
#[derive(Clone)]
pub struct Repository(Arc<dyn Store>);

impl Repository {
    pub fn new(store: impl Store + 'static) -> Self {
        Self(Arc::new(store))
    }
}

impl Deref for Repository {
    type Target = dyn Store;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Repository {
    type Error = ();

    /// Get the store from managed state.
    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        match req.rocket().state::<Repository>() {
            Some(repo) => request::Outcome::Success(repo.clone()),
            None => {
                error!("No store in managed state");
                request::Outcome::Failure((Status::InternalServerError, ()))
            }
        }
    }
}
