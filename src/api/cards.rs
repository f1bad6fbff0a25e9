use rocket::{
    serde::json::{self, Json},
    Route,
};

use crate::error::{Error, Result};
use crate::model::{
    api::{CardSpec, CardUpdate, RequestHost, Viewer},
    db::FinalizedVoterCard,
};
use crate::service::cards;
use crate::store::Repository;

pub fn routes() -> Vec<Route> {
    routes![finalize_card, update_card, get_card]
}

#[post("/finalized-cards", data = "<body>")]
async fn finalize_card(
    body: std::result::Result<Json<CardSpec>, json::Error<'_>>,
    host: RequestHost,
    repo: Repository,
) -> Result<Json<FinalizedVoterCard>> {
    let spec = body.map_err(Error::from_json)?.into_inner();
    let card = cards::finalize(&*repo, &host, spec).await?;
    Ok(Json(card))
}

#[put("/finalized-cards/<id>", data = "<body>")]
async fn update_card(
    id: &str,
    body: std::result::Result<Json<CardUpdate>, json::Error<'_>>,
    host: RequestHost,
    repo: Repository,
) -> Result<Json<FinalizedVoterCard>> {
    let update = body.map_err(Error::from_json)?.into_inner();
    let card = cards::update(&*repo, &host, id, update).await?;
    Ok(Json(card))
}

#[get("/finalized-card/<id>?<viewer..>")]
async fn get_card(
    id: &str,
    viewer: Viewer,
    host: RequestHost,
    repo: Repository,
) -> Result<Json<FinalizedVoterCard>> {
    let card = cards::retrieve(&*repo, &host, id, viewer.visitor_id()).await?;
    Ok(Json(card))
}
