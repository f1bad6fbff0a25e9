use chrono::Utc;
use log::info;

use crate::error::{Error, Result};
use crate::model::{
    api::UserRegistration,
    db::{FinalizedVoterCard, User},
};
use crate::store::Store;

/// Usernames are 3 to 32 characters of ASCII letters, digits, `_` or `-`.
pub fn is_valid_username(username: &str) -> bool {
    (3..=32).contains(&username.len())
        && username
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Claim a username for a visitor.
pub async fn register(store: &dyn Store, registration: UserRegistration) -> Result<User> {
    if !is_valid_username(&registration.username) {
        return Err(Error::bad_request(format!(
            "Username '{}' must be 3-32 letters, digits, '_' or '-'",
            registration.username
        )));
    }
    if registration.visitor_id.trim().is_empty() {
        return Err(Error::bad_request("visitorId must not be empty"));
    }

    let user = User {
        username: registration.username,
        visitor_id: registration.visitor_id,
        created_at: Utc::now(),
    };
    if !store.insert_user(&user).await? {
        return Err(Error::Conflict(format!(
            "Username '{}' is taken",
            user.username
        )));
    }
    info!("Registered username {}", user.username);
    Ok(user)
}

async fn find(store: &dyn Store, username: &str) -> Result<User> {
    store
        .user(username)
        .await?
        .ok_or_else(|| Error::not_found(format!("User '{username}'")))
}

/// The public cards of a registered user.
pub async fn public_cards(
    store: &dyn Store,
    host: &str,
    username: &str,
) -> Result<Vec<FinalizedVoterCard>> {
    let user = find(store, username).await?;
    Ok(store
        .public_cards(&user.visitor_id)
        .await?
        .into_iter()
        .map(|card| card.served_from(host))
        .collect())
}

/// One public card of a registered user. Private cards, and cards belonging
/// to someone else, are reported as missing.
pub async fn public_card(
    store: &dyn Store,
    host: &str,
    username: &str,
    card_id: &str,
) -> Result<FinalizedVoterCard> {
    let user = find(store, username).await?;
    store
        .card(card_id)
        .await?
        .filter(|card| card.is_public && card.is_owned_by(&user.visitor_id))
        .map(|card| card.served_from(host))
        .ok_or_else(|| Error::not_found(format!("Card '{card_id}' of user '{username}'")))
}
