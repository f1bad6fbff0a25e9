use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rocket::serde::json::Value;
use serde::{Deserialize, Serialize};

use crate::model::db::AnalyticsEvent;

/// A usage event reported by a client. The server stamps the time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsRequest {
    pub event_type: String,
    #[serde(default)]
    pub event_data: HashMap<String, Value>,
    #[serde(default)]
    pub visitor_id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl AnalyticsRequest {
    pub fn into_event(self, timestamp: DateTime<Utc>) -> AnalyticsEvent {
        AnalyticsEvent {
            event_type: self.event_type,
            event_data: self.event_data,
            visitor_id: self.visitor_id,
            state: self.state,
            timestamp,
        }
    }
}
