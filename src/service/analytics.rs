use chrono::Utc;
use log::debug;

use crate::error::{Error, Result};
use crate::model::{api::AnalyticsRequest, common::check_optional_state};
use crate::store::Store;

/// Append a usage event, stamped with the server's clock.
pub async fn record(store: &dyn Store, request: AnalyticsRequest) -> Result<()> {
    if request.event_type.trim().is_empty() {
        return Err(Error::bad_request("eventType must not be empty"));
    }
    check_optional_state(request.state.as_deref())?;

    let event = request.into_event(Utc::now());
    store.record(&event).await?;
    debug!("Recorded analytics event {}", event.event_type);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use crate::store::MemoryStore;

    fn request(event_type: &str, state: Option<&str>) -> AnalyticsRequest {
        AnalyticsRequest {
            event_type: event_type.to_string(),
            event_data: HashMap::new(),
            visitor_id: Some("visitor-v".to_string()),
            state: state.map(str::to_string),
        }
    }

    #[rocket::async_test]
    async fn events_are_appended() {
        let store = MemoryStore::default();
        record(&store, request("ballot_viewed", Some("NY"))).await.unwrap();
        record(&store, request("card_shared", None)).await.unwrap();

        let recorded = store.analytics().await;
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].event_type, "ballot_viewed");
        assert_eq!(recorded[1].state, None);
        assert!(recorded[0].timestamp <= recorded[1].timestamp);
    }

    #[rocket::async_test]
    async fn invalid_events_are_dropped() {
        let store = MemoryStore::default();
        assert!(matches!(
            record(&store, request(" ", None)).await,
            Err(Error::BadRequest(_))
        ));
        assert!(matches!(
            record(&store, request("ballot_viewed", Some("CA"))).await,
            Err(Error::Unsupported { .. })
        ));
        assert!(store.analytics().await.is_empty());
    }
}
