//! The voter card builder: line items from decisions, and card storage with
//! owner-only edits and owner-or-public reads.

use chrono::Utc;
use log::info;

use crate::error::{Error, Result};
use crate::model::{
    api::{CardSpec, CardUpdate},
    common::{check_optional_state, new_id},
    db::{CardDecision, Decisions, FinalizedVoterCard, LineItemKind, StoredBallot},
};
use crate::store::Store;

/// Turn a visitor's decisions into display-ready card rows.
///
/// Measures come first in ballot order, then races in ballot order. Items the
/// visitor has not decided on, and decisions naming anything not on the
/// ballot, are left out.
pub fn line_items(ballot: &StoredBallot, decisions: &Decisions) -> Vec<CardDecision> {
    let measures = ballot.measures.iter().filter_map(|measure| {
        let decided = decisions.measure_decisions.get(&measure.id)?;
        Some(CardDecision {
            kind: LineItemKind::Measure,
            title: measure.display_title().to_string(),
            decision: decided.decision.label().to_string(),
            hidden: None,
            note: decided
                .note
                .clone()
                .or_else(|| decisions.notes.get(&measure.id).cloned()),
            description: measure.description.clone(),
        })
    });

    let races = ballot.races.iter().filter_map(|race| {
        let selected = decisions.candidate_selections.get(&race.race.id)?;
        let candidate = race
            .candidates
            .iter()
            .find(|c| c.candidate.id == *selected)?;
        Some(CardDecision {
            kind: LineItemKind::Candidate,
            title: race.race.office.clone(),
            decision: candidate.candidate.display_name(),
            hidden: None,
            note: decisions.notes.get(&race.race.id).cloned(),
            description: race.race.position.clone(),
        })
    });

    measures.chain(races).collect()
}

/// Build line items for a visitor's saved decisions on a cached ballot.
pub async fn line_items_for(
    store: &dyn Store,
    visitor_id: &str,
    ballot_id: &str,
) -> Result<Vec<CardDecision>> {
    let decisions = super::decisions::load(store, visitor_id, ballot_id).await?;
    let ballot = store
        .ballot(ballot_id)
        .await?
        .ok_or_else(|| Error::not_found(format!("Ballot '{ballot_id}'")))?;
    Ok(line_items(&ballot, &decisions))
}

fn validate_items(items: &[CardDecision]) -> Result<()> {
    for (i, item) in items.iter().enumerate() {
        if item.title.trim().is_empty() {
            return Err(Error::bad_request(format!(
                "Card decision {i} must have a title"
            )));
        }
        if item.decision.trim().is_empty() {
            return Err(Error::bad_request(format!(
                "Card decision {i} must have a decision"
            )));
        }
    }
    Ok(())
}

fn validate(spec: &CardSpec) -> Result<()> {
    if spec.visitor_id.trim().is_empty() {
        return Err(Error::bad_request("visitorId must not be empty"));
    }
    if spec.event_id.trim().is_empty() {
        return Err(Error::bad_request("eventId must not be empty"));
    }
    check_optional_state(spec.state.as_deref())?;
    validate_items(&spec.decisions)
}

/// Persist a new card owned by the requesting visitor.
pub async fn finalize(store: &dyn Store, host: &str, spec: CardSpec) -> Result<FinalizedVoterCard> {
    validate(&spec)?;
    let card = spec.into_card(new_id(), host, Utc::now());
    store.insert_card(&card).await?;
    info!(
        "Finalized card {} for visitor {} ({} items)",
        card.id,
        card.visitor_id,
        card.decisions.len()
    );
    Ok(card)
}

async fn find(store: &dyn Store, id: &str) -> Result<FinalizedVoterCard> {
    store
        .card(id)
        .await?
        .ok_or_else(|| Error::not_found(format!("Card '{id}'")))
}

/// Fetch a card for a viewer. Private cards are only shown to their owner.
pub async fn retrieve(
    store: &dyn Store,
    host: &str,
    id: &str,
    viewer: Option<&str>,
) -> Result<FinalizedVoterCard> {
    let card = find(store, id).await?;
    if !card.is_readable_by(viewer) {
        return Err(Error::forbidden(format!("Card '{id}' is private")));
    }
    Ok(card.served_from(host))
}

/// Apply an owner's changes to their card. Anyone else is refused and the
/// card is left untouched.
pub async fn update(
    store: &dyn Store,
    host: &str,
    id: &str,
    update: CardUpdate,
) -> Result<FinalizedVoterCard> {
    let mut card = find(store, id).await?;
    if !card.is_owned_by(&update.visitor_id) {
        return Err(Error::forbidden(format!(
            "Card '{id}' can only be edited by its owner"
        )));
    }
    if let Some(ref items) = update.decisions {
        validate_items(items)?;
    }

    update.apply(&mut card, Utc::now());
    if !store.replace_card(&card).await? {
        return Err(Error::not_found(format!("Card '{id}'")));
    }
    Ok(card.served_from(host))
}
