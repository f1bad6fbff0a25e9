use rocket::{
    serde::json::{self, Json},
    Route,
};

use crate::error::{Error, Result};
use crate::model::{
    api::{RequestHost, UserRegistration},
    db::{FinalizedVoterCard, User},
};
use crate::service::users;
use crate::store::Repository;

pub fn routes() -> Vec<Route> {
    routes![register, user_cards, user_card]
}

#[post("/users", data = "<body>")]
async fn register(
    body: std::result::Result<Json<UserRegistration>, json::Error<'_>>,
    repo: Repository,
) -> Result<Json<User>> {
    let registration = body.map_err(Error::from_json)?.into_inner();
    let user = users::register(&*repo, registration).await?;
    Ok(Json(user))
}

#[get("/users/<username>/cards")]
async fn user_cards(
    username: &str,
    host: RequestHost,
    repo: Repository,
) -> Result<Json<Vec<FinalizedVoterCard>>> {
    let cards = users::public_cards(&*repo, &host, username).await?;
    Ok(Json(cards))
}

#[get("/users/<username>/cards/<card_id>")]
async fn user_card(
    username: &str,
    card_id: &str,
    host: RequestHost,
    repo: Repository,
) -> Result<Json<FinalizedVoterCard>> {
    let card = users::public_card(&*repo, &host, username, card_id).await?;
    Ok(Json(card))
}
