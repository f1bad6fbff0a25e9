use chrono::Utc;
use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{
    api::BallotUpdate,
    common::check_optional_state,
    db::{Ballot, BallotFilter, ElectionEvent, StoredBallot},
};
use crate::store::Store;

/// Cache a freshly assembled ballot under the active election event.
///
/// The first ballot written for a (ZIP code, event) pair is kept; later
/// assemblies never overwrite it. This never fails: every problem, including
/// having no active event, is logged and dropped so the read that triggered
/// it still succeeds.
pub async fn persist(store: &dyn Store, ballot: &Ballot, event: Option<&ElectionEvent>) {
    let zipcode = &ballot.location.zipcode;
    let event = match event {
        Some(event) => event,
        None => {
            warn!("Not caching ballot for ZIP {zipcode}: no active election event");
            return;
        }
    };

    let stored = StoredBallot::new(ballot, event, Utc::now());
    match store.insert_ballot_once(&stored).await {
        Ok(true) => info!(
            "Cached ballot {} for ZIP {zipcode} under event {}",
            stored.id, event.id
        ),
        Ok(false) => debug!("Ballot {} already cached", stored.id),
        Err(err) => warn!("Failed to cache ballot {}: {err}", stored.id),
    }
}

/// Cached ballots matching an admin filter.
pub async fn list(store: &dyn Store, filter: &BallotFilter) -> Result<Vec<StoredBallot>> {
    check_optional_state(filter.state.as_deref())?;
    store.ballots(filter).await
}

/// Correct the election details of a cached ballot. Its contents stay as
/// first cached.
pub async fn correct(store: &dyn Store, update: BallotUpdate) -> Result<StoredBallot> {
    let mut ballot = store
        .ballot(&update.id)
        .await?
        .ok_or_else(|| Error::not_found(format!("Ballot '{}'", update.id)))?;

    if let Some(election_date) = update.election_date {
        ballot.election_date = election_date;
    }
    if let Some(election_type) = update.election_type {
        if election_type.trim().is_empty() {
            return Err(Error::bad_request("electionType must not be empty"));
        }
        ballot.election_type = election_type;
    }
    ballot.updated_at = Utc::now();

    if !store.replace_ballot(&ballot).await? {
        return Err(Error::not_found(format!("Ballot '{}'", update.id)));
    }
    info!("Corrected cached ballot {}", ballot.id);
    Ok(ballot)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::common::ballot_id;
    use crate::model::db::SeedData;
    use crate::store::MemoryStore;

    #[rocket::async_test]
    async fn first_write_wins() {
        let seed = SeedData::example();
        let store = MemoryStore::seeded(seed.clone());
        let event = seed.event("event-ny-2026");
        let ballot = seed.assembled_ballot("10001");
        let id = ballot_id("10001", "event-ny-2026");

        persist(&store, &ballot, Some(&event)).await;
        let first = store.ballot(&id).await.unwrap().unwrap();

        let mut changed = ballot.clone();
        changed.ballot_measures.clear();
        persist(&store, &changed, Some(&event)).await;
        let second = store.ballot(&id).await.unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(second.measure_count, 2);
    }

    #[rocket::async_test]
    async fn failures_are_swallowed() {
        let seed = SeedData::example();
        let store = MemoryStore::seeded(seed.clone());
        let ballot = seed.assembled_ballot("10001");

        persist(&store, &ballot, None).await;
        store.set_ballot_writes_failing(true);
        persist(&store, &ballot, Some(&seed.event("event-ny-2026"))).await;
        store.set_offline(true);
        persist(&store, &ballot, Some(&seed.event("event-ny-2026"))).await;

        store.set_offline(false);
        let cached = store.ballots(&Default::default()).await.unwrap();
        assert!(cached.is_empty());
    }

    #[rocket::async_test]
    async fn corrections_keep_contents() {
        let seed = SeedData::example();
        let store = MemoryStore::seeded(seed.clone());
        let ballot = seed.assembled_ballot("10001");
        persist(&store, &ballot, Some(&seed.event("event-ny-2026"))).await;
        let id = ballot_id("10001", "event-ny-2026");
        let before = store.ballot(&id).await.unwrap().unwrap();

        let date = chrono::NaiveDate::from_ymd_opt(2026, 11, 10).unwrap();
        let corrected = correct(
            &store,
            BallotUpdate {
                id: id.clone(),
                election_date: Some(date),
                election_type: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(corrected.election_date, date);
        assert_eq!(corrected.election_type, before.election_type);
        assert_eq!(corrected.races, before.races);
        assert_eq!(corrected.created_at, before.created_at);
        assert_eq!(store.ballot(&id).await.unwrap().unwrap(), corrected);

        let blank = BallotUpdate {
            id: id.clone(),
            election_date: None,
            election_type: Some(" ".to_string()),
        };
        assert!(matches!(
            correct(&store, blank).await,
            Err(Error::BadRequest(_))
        ));
        let missing = BallotUpdate {
            id: "nope".to_string(),
            election_date: None,
            election_type: None,
        };
        assert!(matches!(
            correct(&store, missing).await,
            Err(Error::NotFound(_))
        ));
    }

    #[rocket::async_test]
    async fn listing_checks_the_state() {
        let store = MemoryStore::default();
        let filter = BallotFilter {
            state: Some("CA".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            list(&store, &filter).await,
            Err(Error::Unsupported { .. })
        ));
        assert!(list(&store, &BallotFilter::default()).await.unwrap().is_empty());
    }
}
