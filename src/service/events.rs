use chrono::Utc;
use log::info;

use crate::error::{Error, Result};
use crate::model::{
    api::EventSpec,
    common::{new_id, StateCode},
    db::{ElectionEvent, Location},
};
use crate::store::Store;

/// The election event ballots for this location are cached against: the
/// earliest upcoming public event covering it, if any.
pub async fn active_event(store: &dyn Store, location: &Location) -> Result<Option<ElectionEvent>> {
    Ok(store
        .events_in_state(&location.state)
        .await?
        .into_iter()
        .filter(|event| event.covers(location))
        .min_by_key(|event| event.election_date))
}

/// Fetch an event that has not been soft-deleted.
pub async fn live_event(store: &dyn Store, id: &str) -> Result<ElectionEvent> {
    store
        .event(id)
        .await?
        .filter(|event| !event.is_deleted())
        .ok_or_else(|| Error::not_found(format!("Election event '{id}'")))
}

/// Check an event spec before it reaches storage.
fn validate(spec: &EventSpec) -> Result<()> {
    spec.state.parse::<StateCode>()?.require_pilot()?;
    if spec.title.trim().is_empty() {
        return Err(Error::bad_request("Event title must not be empty"));
    }
    if spec.event_type.trim().is_empty() {
        return Err(Error::bad_request("Event type must not be empty"));
    }
    if let Some(deadline) = spec.registration_deadline {
        if deadline > spec.election_date {
            return Err(Error::bad_request(
                "Registration deadline must not be after the election date",
            ));
        }
    }
    Ok(())
}

pub async fn create(store: &dyn Store, spec: EventSpec) -> Result<ElectionEvent> {
    validate(&spec)?;
    let now = Utc::now();
    let event = spec.into_event(new_id(), now);
    store.insert_event(&event).await?;
    info!("Created election event {} ({})", event.id, event.title);
    Ok(event)
}

/// Overwrite an event's details, keeping its identity and lifecycle flags.
pub async fn update(store: &dyn Store, id: &str, spec: EventSpec) -> Result<ElectionEvent> {
    validate(&spec)?;
    let existing = live_event(store, id).await?;
    let mut event = spec.into_event(existing.id, Utc::now());
    event.archived = existing.archived;
    event.created_at = existing.created_at;
    save(store, event).await
}

pub async fn set_archived(store: &dyn Store, id: &str, archived: bool) -> Result<ElectionEvent> {
    let mut event = live_event(store, id).await?;
    event.archived = archived;
    event.updated_at = Utc::now();
    save(store, event).await
}

/// Undo both archiving and soft deletion.
pub async fn restore(store: &dyn Store, id: &str) -> Result<ElectionEvent> {
    let mut event = store
        .event(id)
        .await?
        .ok_or_else(|| Error::not_found(format!("Election event '{id}'")))?;
    event.archived = false;
    event.deleted_at = None;
    event.updated_at = Utc::now();
    save(store, event).await
}

/// Soft delete: the row stays, but nothing lists or resolves it any more.
pub async fn delete(store: &dyn Store, id: &str) -> Result<ElectionEvent> {
    let mut event = live_event(store, id).await?;
    let now = Utc::now();
    event.deleted_at = Some(now);
    event.updated_at = now;
    save(store, event).await
}

async fn save(store: &dyn Store, event: ElectionEvent) -> Result<ElectionEvent> {
    if !store.replace_event(&event).await? {
        return Err(Error::not_found(format!("Election event '{}'", event.id)));
    }
    Ok(event)
}
