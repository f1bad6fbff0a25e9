//! MongoDB-backed store.

use mongodb::{
    bson::{doc, Bson, Document},
    error::{Error as DbError, ErrorKind, WriteFailure},
    options::ReplaceOptions,
    Database,
};
use rocket::futures::TryStreamExt;

use crate::error::Result;
use crate::model::db::{
    AnalyticsEvent, BallotFilter, BallotMeasure, Candidate, Decisions, ElectionEvent, Endorsement,
    FinalizedVoterCard, Location, Race, RaceCandidate, StoredBallot, User, ZipDistrict,
};

use super::Store;

mod collection;

pub use collection::ensure_indexes_exist;
use collection::{Coll, MongoCollection};

/// Server error code for a unique index violation. The driver has no constant for it.
const DUPLICATE_KEY: i32 = 11000;

fn is_duplicate_key_error(err: &DbError) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref e)) if e.code == DUPLICATE_KEY
    )
}

/// A store over the collections of one MongoDB database.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn coll<T: MongoCollection>(&self) -> Coll<T> {
        Coll::from_db(&self.db)
    }
}

fn by_id(id: &str) -> Document {
    doc! { "id": id }
}

fn not_deleted(mut filter: Document) -> Document {
    filter.insert("deletedAt", Bson::Null);
    filter
}

#[rocket::async_trait]
impl Store for MongoStore {
    async fn location(&self, zipcode: &str) -> Result<Option<Location>> {
        Ok(self
            .coll::<Location>()
            .find_one(doc! { "zipcode": zipcode }, None)
            .await?)
    }

    async fn district_ids(&self, zipcode: &str) -> Result<Vec<String>> {
        Ok(self
            .coll::<ZipDistrict>()
            .find(doc! { "zipcode": zipcode }, None)
            .await?
            .map_ok(|link| link.district_id)
            .try_collect()
            .await?)
    }

    async fn races_in_district(&self, district_id: &str) -> Result<Vec<Race>> {
        Ok(self
            .coll::<Race>()
            .find(doc! { "districtId": district_id }, None)
            .await?
            .try_collect()
            .await?)
    }

    async fn races_in_state(&self, state: &str) -> Result<Vec<Race>> {
        Ok(self
            .coll::<Race>()
            .find(doc! { "state": state }, None)
            .await?
            .try_collect()
            .await?)
    }

    async fn race(&self, race_id: &str) -> Result<Option<Race>> {
        Ok(self.coll::<Race>().find_one(by_id(race_id), None).await?)
    }

    async fn race_candidates(&self, race_id: &str) -> Result<Vec<RaceCandidate>> {
        Ok(self
            .coll::<RaceCandidate>()
            .find(doc! { "raceId": race_id }, None)
            .await?
            .try_collect()
            .await?)
    }

    async fn candidates(&self, ids: &[String]) -> Result<Vec<Candidate>> {
        Ok(self
            .coll::<Candidate>()
            .find(doc! { "id": { "$in": ids.to_vec() } }, None)
            .await?
            .try_collect()
            .await?)
    }

    async fn endorsements(&self, candidate_id: &str) -> Result<Vec<Endorsement>> {
        Ok(self
            .coll::<Endorsement>()
            .find(doc! { "candidateId": candidate_id }, None)
            .await?
            .try_collect()
            .await?)
    }

    async fn measures_in_state(&self, state: &str) -> Result<Vec<BallotMeasure>> {
        Ok(self
            .coll::<BallotMeasure>()
            .find(doc! { "state": state }, None)
            .await?
            .try_collect()
            .await?)
    }

    async fn measure(&self, measure_id: &str) -> Result<Option<BallotMeasure>> {
        Ok(self
            .coll::<BallotMeasure>()
            .find_one(by_id(measure_id), None)
            .await?)
    }

    async fn insert_ballot_once(&self, ballot: &StoredBallot) -> Result<bool> {
        match self.coll::<StoredBallot>().insert_one(ballot, None).await {
            Ok(_) => Ok(true),
            Err(err) if is_duplicate_key_error(&err) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn ballot(&self, id: &str) -> Result<Option<StoredBallot>> {
        Ok(self.coll::<StoredBallot>().find_one(by_id(id), None).await?)
    }

    async fn ballots(&self, filter: &BallotFilter) -> Result<Vec<StoredBallot>> {
        let mut query = Document::new();
        if let Some(ref event_id) = filter.event_id {
            query.insert("eventId", event_id);
        }
        if let Some(ref state) = filter.state {
            query.insert("state", state);
        }
        Ok(self
            .coll::<StoredBallot>()
            .find(query, None)
            .await?
            .try_collect()
            .await?)
    }

    async fn replace_ballot(&self, ballot: &StoredBallot) -> Result<bool> {
        let result = self
            .coll::<StoredBallot>()
            .replace_one(by_id(&ballot.id), ballot, None)
            .await?;
        Ok(result.matched_count == 1)
    }

    async fn events(&self, archived: bool) -> Result<Vec<ElectionEvent>> {
        Ok(self
            .coll::<ElectionEvent>()
            .find(not_deleted(doc! { "archived": archived }), None)
            .await?
            .try_collect()
            .await?)
    }

    async fn events_in_state(&self, state: &str) -> Result<Vec<ElectionEvent>> {
        Ok(self
            .coll::<ElectionEvent>()
            .find(not_deleted(doc! { "state": state }), None)
            .await?
            .try_collect()
            .await?)
    }

    async fn event(&self, id: &str) -> Result<Option<ElectionEvent>> {
        Ok(self.coll::<ElectionEvent>().find_one(by_id(id), None).await?)
    }

    async fn insert_event(&self, event: &ElectionEvent) -> Result<()> {
        self.coll::<ElectionEvent>().insert_one(event, None).await?;
        Ok(())
    }

    async fn replace_event(&self, event: &ElectionEvent) -> Result<bool> {
        let result = self
            .coll::<ElectionEvent>()
            .replace_one(by_id(&event.id), event, None)
            .await?;
        Ok(result.matched_count == 1)
    }

    async fn save_decisions(&self, decisions: &Decisions) -> Result<()> {
        let filter = doc! {
            "visitorId": &decisions.visitor_id,
            "ballotId": &decisions.ballot_id,
        };
        let upsert = ReplaceOptions::builder().upsert(true).build();
        self.coll::<Decisions>()
            .replace_one(filter, decisions, upsert)
            .await?;
        Ok(())
    }

    async fn decisions(&self, visitor_id: &str, ballot_id: &str) -> Result<Option<Decisions>> {
        let filter = doc! {
            "visitorId": visitor_id,
            "ballotId": ballot_id,
        };
        Ok(self.coll::<Decisions>().find_one(filter, None).await?)
    }

    async fn insert_card(&self, card: &FinalizedVoterCard) -> Result<()> {
        self.coll::<FinalizedVoterCard>()
            .insert_one(card, None)
            .await?;
        Ok(())
    }

    async fn card(&self, id: &str) -> Result<Option<FinalizedVoterCard>> {
        Ok(self
            .coll::<FinalizedVoterCard>()
            .find_one(by_id(id), None)
            .await?)
    }

    async fn replace_card(&self, card: &FinalizedVoterCard) -> Result<bool> {
        let result = self
            .coll::<FinalizedVoterCard>()
            .replace_one(by_id(&card.id), card, None)
            .await?;
        Ok(result.matched_count == 1)
    }

    async fn public_cards(&self, visitor_id: &str) -> Result<Vec<FinalizedVoterCard>> {
        let filter = doc! {
            "visitorId": visitor_id,
            "isPublic": true,
        };
        Ok(self
            .coll::<FinalizedVoterCard>()
            .find(filter, None)
            .await?
            .try_collect()
            .await?)
    }

    async fn user(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .coll::<User>()
            .find_one(doc! { "username": username }, None)
            .await?)
    }

    async fn insert_user(&self, user: &User) -> Result<bool> {
        match self.coll::<User>().insert_one(user, None).await {
            Ok(_) => Ok(true),
            Err(err) if is_duplicate_key_error(&err) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    async fn record(&self, event: &AnalyticsEvent) -> Result<()> {
        self.coll::<AnalyticsEvent>().insert_one(event, None).await?;
        Ok(())
    }
}
