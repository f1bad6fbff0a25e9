use std::ops::Deref;

use log::debug;
use mongodb::{
    bson::{doc, Document},
    error::Error as DbError,
    options::IndexOptions,
    Collection, Database, IndexModel,
};

use crate::model::db::{
    AnalyticsEvent, BallotMeasure, Candidate, Decisions, ElectionEvent, Endorsement,
    FinalizedVoterCard, Location, Race, RaceCandidate, StoredBallot, User, ZipDistrict,
};

/// A stored type with its own collection.
pub trait MongoCollection {
    const NAME: &'static str;
}

/// A typed handle on the collection holding `T`.
pub struct Coll<T>(Collection<T>);

impl<T: MongoCollection> Coll<T> {
    pub fn from_db(db: &Database) -> Self {
        Self(db.collection(T::NAME))
    }
}

impl<T> Deref for Coll<T> {
    type Target = Collection<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

macro_rules! collections {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl MongoCollection for $ty {
                const NAME: &'static str = $name;
            }
        )*
    };
}

collections! {
    Location => "zipcodes",
    ZipDistrict => "zipcode_districts",
    Race => "races",
    RaceCandidate => "race_candidates",
    Candidate => "candidates",
    Endorsement => "candidate_endorsements",
    BallotMeasure => "ballot_measures",
    StoredBallot => "ballots",
    ElectionEvent => "election_events",
    Decisions => "decisions",
    FinalizedVoterCard => "finalized_voter_cards",
    User => "users",
    AnalyticsEvent => "analytics_events",
}

/// Ensure that all the required indexes exist on the given database.
///
/// This operation is idempotent.
pub async fn ensure_indexes_exist(db: &Database) -> Result<(), DbError> {
    debug!("Ensuring collection indexes exist");

    async fn unique<T: MongoCollection>(db: &Database, keys: Document) -> Result<(), DbError> {
        let index = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build();
        Coll::<T>::from_db(db).create_index(index, None).await?;
        Ok(())
    }

    async fn plain<T: MongoCollection>(db: &Database, keys: Document) -> Result<(), DbError> {
        let index = IndexModel::builder().keys(keys).build();
        Coll::<T>::from_db(db).create_index(index, None).await?;
        Ok(())
    }

    unique::<Location>(db, doc! {"zipcode": 1}).await?;
    plain::<ZipDistrict>(db, doc! {"zipcode": 1}).await?;
    unique::<Race>(db, doc! {"id": 1}).await?;
    plain::<Race>(db, doc! {"districtId": 1}).await?;
    plain::<RaceCandidate>(db, doc! {"raceId": 1}).await?;
    unique::<Candidate>(db, doc! {"id": 1}).await?;
    plain::<Endorsement>(db, doc! {"candidateId": 1}).await?;
    unique::<BallotMeasure>(db, doc! {"id": 1}).await?;
    // Insert-once ballot caching relies on this one.
    unique::<StoredBallot>(db, doc! {"id": 1}).await?;
    unique::<ElectionEvent>(db, doc! {"id": 1}).await?;
    unique::<Decisions>(db, doc! {"visitorId": 1, "ballotId": 1}).await?;
    unique::<FinalizedVoterCard>(db, doc! {"id": 1}).await?;
    unique::<User>(db, doc! {"username": 1}).await?;

    Ok(())
}
