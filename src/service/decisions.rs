use chrono::Utc;
use log::debug;

use crate::error::{Error, Result};
use crate::model::{api::DecisionsRequest, db::Decisions};
use crate::store::Store;

/// Reject blank keys and IDs before anything is written.
///
/// Decisions are not checked against any ballot: visitors may record them
/// before the ballot they refer to has been cached.
fn validate(request: &DecisionsRequest) -> Result<()> {
    if request.visitor_id.trim().is_empty() {
        return Err(Error::bad_request("visitorId must not be empty"));
    }
    if request.ballot_id.trim().is_empty() {
        return Err(Error::bad_request("ballotId must not be empty"));
    }
    let blank = |key: &String| key.trim().is_empty();
    if request.measure_decisions.keys().any(blank) {
        return Err(Error::bad_request("measureDecisions keys must be measure IDs"));
    }
    if request.candidate_selections.keys().any(blank)
        || request.candidate_selections.values().any(blank)
    {
        return Err(Error::bad_request(
            "candidateSelections must map race IDs to candidate IDs",
        ));
    }
    if request.notes.keys().any(blank) {
        return Err(Error::bad_request("notes keys must be item IDs"));
    }
    Ok(())
}

/// Save a visitor's decisions for a ballot, replacing any earlier save.
pub async fn save(store: &dyn Store, request: DecisionsRequest) -> Result<Decisions> {
    validate(&request)?;
    let decisions = request.into_decisions(Utc::now());
    store.save_decisions(&decisions).await?;
    debug!(
        "Saved {} measure decisions and {} selections for visitor {} on ballot {}",
        decisions.measure_decisions.len(),
        decisions.candidate_selections.len(),
        decisions.visitor_id,
        decisions.ballot_id
    );
    Ok(decisions)
}

pub async fn load(store: &dyn Store, visitor_id: &str, ballot_id: &str) -> Result<Decisions> {
    store
        .decisions(visitor_id, ballot_id)
        .await?
        .ok_or_else(|| {
            Error::not_found(format!(
                "Decisions of visitor '{visitor_id}' for ballot '{ballot_id}'"
            ))
        })
}
