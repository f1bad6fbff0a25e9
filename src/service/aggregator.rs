//! Assembly of the full ballot for a location from the normalised tables.
//!
//! Sibling lookups run concurrently, but results are recombined by position:
//! races keep district fetch order and candidates keep join-table order.
//! Any failed lookup fails the whole assembly; no partial ballot is returned.

use std::collections::{HashMap, HashSet};

use rocket::futures::future::{try_join, try_join_all};

use crate::error::{Error, Result};
use crate::model::db::{Ballot, BallotCandidate, BallotRace, Candidate, Location, Race};
use crate::store::Store;

/// Assemble the ballot for a location. Read-only.
pub async fn assemble(store: &dyn Store, location: &Location) -> Result<Ballot> {
    let (races, ballot_measures) = try_join(
        district_races(store, &location.zipcode),
        store.measures_in_state(&location.state),
    )
    .await?;

    let races = try_join_all(races.into_iter().map(|race| async move {
        let candidates = race_candidates(store, &race.id).await?;
        Ok::<_, Error>(BallotRace { race, candidates })
    }))
    .await?;

    Ok(Ballot {
        location: location.clone(),
        races,
        ballot_measures,
    })
}

/// Every race in every district the ZIP code overlaps.
/// A race reachable through two districts is listed once.
async fn district_races(store: &dyn Store, zipcode: &str) -> Result<Vec<Race>> {
    let mut seen = HashSet::new();
    let district_ids: Vec<String> = store
        .district_ids(zipcode)
        .await?
        .into_iter()
        .filter(|id| seen.insert(id.clone()))
        .collect();

    let per_district =
        try_join_all(district_ids.iter().map(|id| store.races_in_district(id))).await?;

    let mut seen = HashSet::new();
    Ok(per_district
        .into_iter()
        .flatten()
        .filter(|race| seen.insert(race.id.clone()))
        .collect())
}

/// The candidates running in a race, each with their endorsements.
///
/// Candidate rows are fetched in one batch; join rows pointing at unknown
/// candidates are skipped.
pub async fn race_candidates(store: &dyn Store, race_id: &str) -> Result<Vec<BallotCandidate>> {
    let links = store.race_candidates(race_id).await?;
    if links.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<String> = links.iter().map(|l| l.candidate_id.clone()).collect();
    let by_id: HashMap<String, Candidate> = store
        .candidates(&ids)
        .await?
        .into_iter()
        .map(|c| (c.id.clone(), c))
        .collect();

    let running = links.into_iter().filter_map(|link| {
        let candidate = by_id.get(&link.candidate_id)?.clone();
        Some((candidate, link))
    });

    try_join_all(running.map(|(candidate, link)| async move {
        let endorsements = store.endorsements(&candidate.id).await?;
        Ok::<_, Error>(BallotCandidate::new(candidate, link, endorsements))
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::db::{RaceCandidate, SeedData, ZipDistrict};
    use crate::store::MemoryStore;

    #[rocket::async_test]
    async fn full_ballot() {
        let seed = SeedData::example();
        let store = MemoryStore::seeded(seed.clone());
        let ballot = assemble(&store, &seed.location("10001")).await.unwrap();
        assert_eq!(ballot, seed.assembled_ballot("10001"));

        let offices: Vec<_> = ballot.races.iter().map(|r| r.race.office.as_str()).collect();
        assert_eq!(offices, vec!["U.S. House", "State Senate"]);
        let names: Vec<_> = ballot.races[0]
            .candidates
            .iter()
            .map(|c| c.candidate.id.as_str())
            .collect();
        assert_eq!(names, vec!["cand-alvarez", "cand-brooks"]);
        assert_eq!(ballot.races[0].candidates[0].endorsements.len(), 2);
        assert_eq!(ballot.races[0].candidates[0].primary_votes, Some(41_000));
        assert!(ballot.races[0].candidates[1].endorsements.is_empty());
        assert!(ballot.races[1].candidates.is_empty());
        assert_eq!(ballot.ballot_measures.len(), 2);
    }

    #[rocket::async_test]
    async fn no_districts_is_empty_not_an_error() {
        let seed = SeedData::example();
        let store = MemoryStore::seeded(seed.clone());
        let ballot = assemble(&store, &seed.location("11201")).await.unwrap();
        assert!(ballot.races.is_empty());
        // Measures are state-wide, so Brooklyn still gets New York's.
        assert_eq!(ballot.ballot_measures.len(), 2);
    }

    #[rocket::async_test]
    async fn assembling_twice_is_identical() {
        let seed = SeedData::example();
        let store = MemoryStore::seeded(seed.clone());
        let first = assemble(&store, &seed.location("07030")).await.unwrap();
        let second = assemble(&store, &seed.location("07030")).await.unwrap();
        assert_eq!(first, second);
    }

    #[rocket::async_test]
    async fn duplicates_and_dangling_links() {
        let mut seed = SeedData::example();
        // A second route to the same race, and a link to a missing candidate.
        seed.zip_districts.push(ZipDistrict {
            zipcode: "10001".to_string(),
            district_id: "ny-cd-12".to_string(),
        });
        seed.race_candidates.push(RaceCandidate {
            race_id: "race-ny-sd47".to_string(),
            candidate_id: "cand-ghost".to_string(),
            primary_votes: None,
            percentage: None,
            is_won_primary: None,
        });
        let store = MemoryStore::seeded(seed.clone());

        let ballot = assemble(&store, &seed.location("10001")).await.unwrap();
        let ids: Vec<_> = ballot.races.iter().map(|r| r.race.id.as_str()).collect();
        assert_eq!(ids, vec!["race-ny-cd12", "race-ny-sd47"]);
        assert!(ballot.races[1].candidates.is_empty());
    }

    #[rocket::async_test]
    async fn failure_aborts_assembly() {
        let seed = SeedData::example();
        let store = MemoryStore::seeded(seed.clone());
        store.set_offline(true);
        assert!(assemble(&store, &seed.location("10001")).await.is_err());
    }

    #[rocket::async_test]
    async fn single_race() {
        let store = MemoryStore::seeded(SeedData::example());
        let candidates = race_candidates(&store, "race-nj-cd8").await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].candidate.display_name(), "Wei Chen");
        assert_eq!(candidates[0].endorsements[0].organization, "Hoboken Chamber of Commerce");
        assert!(race_candidates(&store, "race-none").await.unwrap().is_empty());
    }
}
