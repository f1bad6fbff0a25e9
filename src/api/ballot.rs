use log::warn;
use rocket::{serde::json::Json, Route};

use crate::error::{Error, Result};
use crate::model::{
    api::{BallotResponse, LocationLookup, RaceCandidates, StateRaces},
    common::{StateCode, Zipcode},
};
use crate::service::{aggregator, cache, events, resolver};
use crate::store::Repository;

pub fn routes() -> Vec<Route> {
    routes![get_ballot, lookup_zip, races_by_state, race_candidates]
}

#[get("/ballot/<zipcode>")]
async fn get_ballot(zipcode: &str, repo: Repository) -> Result<Json<BallotResponse>> {
    let zipcode: Zipcode = zipcode.parse()?;
    let location = resolver::resolve(&*repo, &zipcode).await?;
    let ballot = aggregator::assemble(&*repo, &location).await?;

    // Caching is best-effort from here on: nothing below can fail the read.
    let event = match events::active_event(&*repo, &location).await {
        Ok(event) => event,
        Err(err) => {
            warn!("Could not resolve the active event for ZIP {zipcode}: {err}");
            None
        }
    };
    cache::persist(&*repo, &ballot, event.as_ref()).await;

    Ok(Json(BallotResponse::new(ballot, event.as_ref())))
}

#[get("/lookup-zip/<zipcode>")]
async fn lookup_zip(zipcode: &str, repo: Repository) -> Result<Json<LocationLookup>> {
    let zipcode: Zipcode = zipcode.parse()?;
    let location = resolver::resolve(&*repo, &zipcode).await?;
    Ok(Json(location.into()))
}

#[get("/races/by-state/<state>")]
async fn races_by_state(state: &str, repo: Repository) -> Result<Json<StateRaces>> {
    let state = state.parse::<StateCode>()?.require_pilot()?;
    let races = repo.races_in_state(state.as_str()).await?;
    Ok(Json(StateRaces {
        state: state.to_string(),
        races,
    }))
}

#[get("/candidates/race/<race_id>")]
async fn race_candidates(race_id: &str, repo: Repository) -> Result<Json<RaceCandidates>> {
    let race = repo
        .race(race_id)
        .await?
        .ok_or_else(|| Error::not_found(format!("Race '{race_id}'")))?;
    let candidates = aggregator::race_candidates(&*repo, &race.id).await?;
    Ok(Json(RaceCandidates { race, candidates }))
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::Status,
        local::asynchronous::Client,
        serde::json::{json, Value},
    };

    use crate::model::{common::ballot_id, db::BallotFilter};
    use crate::store::{MemoryStore, Store};

    use super::*;

    #[backend_test]
    async fn ballot_for_manhattan(client: Client) {
        let response = client.get(uri!(get_ballot("10001"))).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        let ballot: Value = response.into_json().await.unwrap();

        assert_eq!(ballot["zipcode"], json!("10001"));
        assert_eq!(ballot["state"], json!("NY"));
        assert_eq!(ballot["county"], json!("New York"));
        assert_eq!(ballot["city"], json!("New York"));
        assert_eq!(ballot["eventId"], json!("event-ny-2026"));
        assert_eq!(
            ballot["ballotId"],
            json!(ballot_id("10001", "event-ny-2026"))
        );

        let races = ballot["races"].as_array().unwrap();
        assert_eq!(races.len(), 2);
        for race in races {
            assert!(!race["office"].as_str().unwrap().is_empty());
            assert!(race["candidates"].is_array());
        }
        // The state senate race has nobody running yet.
        assert_eq!(races[1]["candidates"], json!([]));
        let alvarez = &races[0]["candidates"][0];
        assert_eq!(alvarez["lastName"], json!("Alvarez"));
        assert_eq!(alvarez["endorsements"][1]["organization"], json!("NYC Teachers Union"));

        let measures = ballot["ballotMeasures"].as_array().unwrap();
        assert_eq!(measures.len(), 2);
        assert_eq!(measures[0]["proArguments"].as_array().unwrap().len(), 1);
    }

    #[backend_test]
    async fn zip_errors(client: Client) {
        let unknown = client.get(uri!(get_ballot("99999"))).dispatch().await;
        assert_eq!(Status::NotFound, unknown.status());
        let body: Value = unknown.into_json().await.unwrap();
        assert!(body["error"].is_string());

        for malformed in ["1234", "123456", "abcde", "1234a"] {
            let response = client.get(uri!(get_ballot(malformed))).dispatch().await;
            assert_eq!(Status::BadRequest, response.status(), "{malformed}");
            let body: Value = response.into_json().await.unwrap();
            assert!(body["error"].as_str().unwrap().contains("5 digits"));
        }

        let unsupported = client.get(uri!(get_ballot("90210"))).dispatch().await;
        assert_eq!(Status::BadRequest, unsupported.status());
        let body: Value = unsupported.into_json().await.unwrap();
        assert_eq!(body["supported"], json!(false));
        assert_eq!(body["state"], json!("CA"));
    }

    #[backend_test]
    async fn ballots_are_cached_once(client: Client, store: MemoryStore) {
        let first: Value = client
            .get(uri!(get_ballot("07030")))
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap();
        let second: Value = client
            .get(uri!(get_ballot("07030")))
            .dispatch()
            .await
            .into_json()
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first["eventId"], json!("event-nj-2026"));

        let cached = store.ballots(&BallotFilter::default()).await.unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].id, ballot_id("07030", "event-nj-2026"));
        assert_eq!(cached[0].race_count, 1);
        assert_eq!(cached[0].candidate_count, 1);
    }

    #[backend_test]
    async fn ballot_without_event_is_not_cached(client: Client, store: MemoryStore) {
        let response = client.get(uri!(get_ballot("19104"))).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        let ballot: Value = response.into_json().await.unwrap();
        assert_eq!(ballot["races"], json!([]));
        assert!(ballot.get("ballotId").is_none());
        assert!(store
            .ballots(&BallotFilter::default())
            .await
            .unwrap()
            .is_empty());
    }

    #[backend_test]
    async fn cache_failure_does_not_fail_the_read(client: Client, store: MemoryStore) {
        store.set_ballot_writes_failing(true);
        let response = client.get(uri!(get_ballot("10001"))).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        let ballot: Value = response.into_json().await.unwrap();
        assert_eq!(ballot["races"].as_array().unwrap().len(), 2);
    }

    #[backend_test]
    async fn storage_failure_is_a_generic_500(client: Client, store: MemoryStore) {
        store.set_offline(true);
        let response = client.get(uri!(get_ballot("10001"))).dispatch().await;
        assert_eq!(Status::InternalServerError, response.status());
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }

    #[backend_test]
    async fn lookup(client: Client) {
        let response = client.get(uri!(lookup_zip("07030"))).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        let lookup: LocationLookup = response.into_json().await.unwrap();
        assert_eq!(
            lookup,
            LocationLookup {
                state: "NJ".to_string(),
                county: "Hudson".to_string(),
                city: "Hoboken".to_string(),
                supported: true,
            }
        );

        let unsupported = client.get(uri!(lookup_zip("90210"))).dispatch().await;
        assert_eq!(Status::BadRequest, unsupported.status());
        let body: Value = unsupported.into_json().await.unwrap();
        assert_eq!(body["supported"], json!(false));
        assert_eq!(body["city"], json!("Beverly Hills"));

        let unknown = client.get(uri!(lookup_zip("00000"))).dispatch().await;
        assert_eq!(Status::NotFound, unknown.status());
    }

    #[backend_test]
    async fn races_in_state(client: Client) {
        let response = client.get(uri!(races_by_state("NY"))).dispatch().await;
        assert_eq!(Status::Ok, response.status());
        let races: StateRaces = response.into_json().await.unwrap();
        assert_eq!(races.state, "NY");
        assert_eq!(races.races.len(), 2);

        let response = client.get(uri!(races_by_state("ny"))).dispatch().await;
        assert_eq!(Status::BadRequest, response.status());
        let response = client.get(uri!(races_by_state("CA"))).dispatch().await;
        assert_eq!(Status::BadRequest, response.status());
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["supported"], json!(false));
    }

    #[backend_test]
    async fn candidates_for_race(client: Client) {
        let response = client
            .get(uri!(race_candidates("race-ny-cd12")))
            .dispatch()
            .await;
        assert_eq!(Status::Ok, response.status());
        let race: RaceCandidates = response.into_json().await.unwrap();
        assert_eq!(race.race.office, "U.S. House");
        assert_eq!(race.candidates.len(), 2);
        assert_eq!(race.candidates[1].candidate.last_name, "Brooks");

        let response = client
            .get(uri!(race_candidates("race-missing")))
            .dispatch()
            .await;
        assert_eq!(Status::NotFound, response.status());
    }
}
