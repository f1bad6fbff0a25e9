use rocket::{
    serde::json::{self, Json},
    Route,
};

use crate::error::{Error, Result};
use crate::model::{
    api::DecisionsRequest,
    db::{CardDecision, Decisions},
};
use crate::service::{cards, decisions};
use crate::store::Repository;

pub fn routes() -> Vec<Route> {
    routes![save_decisions, get_decisions, card_items]
}

#[post("/decisions", data = "<body>")]
async fn save_decisions(
    body: std::result::Result<Json<DecisionsRequest>, json::Error<'_>>,
    repo: Repository,
) -> Result<Json<Decisions>> {
    let request = body.map_err(Error::from_json)?.into_inner();
    let saved = decisions::save(&*repo, request).await?;
    Ok(Json(saved))
}

#[get("/decisions/<visitor_id>/<ballot_id>")]
async fn get_decisions(
    visitor_id: &str,
    ballot_id: &str,
    repo: Repository,
) -> Result<Json<Decisions>> {
    let saved = decisions::load(&*repo, visitor_id, ballot_id).await?;
    Ok(Json(saved))
}

/// Voter card line items for a visitor's saved decisions.
#[get("/decisions/<visitor_id>/<ballot_id>/card-items")]
async fn card_items(
    visitor_id: &str,
    ballot_id: &str,
    repo: Repository,
) -> Result<Json<Vec<CardDecision>>> {
    let items = cards::line_items_for(&*repo, visitor_id, ballot_id).await?;
    Ok(Json(items))
}
