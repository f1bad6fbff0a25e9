use rocket::{
    serde::json::{self, Json},
    Route,
};

use crate::error::{Error, Result};
use crate::model::{
    api::{BallotUpdate, EventSpec},
    db::{BallotFilter, ElectionEvent, StoredBallot},
};
use crate::service::{cache, events};
use crate::store::Repository;

pub fn routes() -> Vec<Route> {
    routes![
        get_events,
        create_event,
        modify_event,
        archive_event,
        restore_event,
        delete_event,
        get_ballots,
        correct_ballot,
    ]
}

/// Live events, or archived ones with `?archived=true`.
#[get("/admin/events?<archived>")]
async fn get_events(archived: Option<bool>, repo: Repository) -> Result<Json<Vec<ElectionEvent>>> {
    let events = repo.events(archived.unwrap_or(false)).await?;
    Ok(Json(events))
}

#[post("/admin/events", data = "<body>")]
async fn create_event(
    body: std::result::Result<Json<EventSpec>, json::Error<'_>>,
    repo: Repository,
) -> Result<Json<ElectionEvent>> {
    let spec = body.map_err(Error::from_json)?.into_inner();
    let event = events::create(&*repo, spec).await?;
    Ok(Json(event))
}

#[put("/admin/events/<id>", data = "<body>")]
async fn modify_event(
    id: &str,
    body: std::result::Result<Json<EventSpec>, json::Error<'_>>,
    repo: Repository,
) -> Result<Json<ElectionEvent>> {
    let spec = body.map_err(Error::from_json)?.into_inner();
    let event = events::update(&*repo, id, spec).await?;
    Ok(Json(event))
}

#[post("/admin/events/<id>/archive")]
async fn archive_event(id: &str, repo: Repository) -> Result<Json<ElectionEvent>> {
    let event = events::set_archived(&*repo, id, true).await?;
    Ok(Json(event))
}

#[post("/admin/events/<id>/restore")]
async fn restore_event(id: &str, repo: Repository) -> Result<Json<ElectionEvent>> {
    let event = events::restore(&*repo, id).await?;
    Ok(Json(event))
}

#[delete("/admin/events/<id>")]
async fn delete_event(id: &str, repo: Repository) -> Result<Json<ElectionEvent>> {
    let event = events::delete(&*repo, id).await?;
    Ok(Json(event))
}

#[get("/admin/ballots?<filter..>")]
async fn get_ballots(filter: BallotFilter, repo: Repository) -> Result<Json<Vec<StoredBallot>>> {
    let ballots = cache::list(&*repo, &filter).await?;
    Ok(Json(ballots))
}

#[put("/admin/ballots", data = "<body>")]
async fn correct_ballot(
    body: std::result::Result<Json<BallotUpdate>, json::Error<'_>>,
    repo: Repository,
) -> Result<Json<StoredBallot>> {
    let update = body.map_err(Error::from_json)?.into_inner();
    let ballot = cache::correct(&*repo, update).await?;
    Ok(Json(ballot))
}
