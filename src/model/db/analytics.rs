use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rocket::serde::json::Value;
use serde::{Deserialize, Serialize};

/// An append-only usage record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub event_type: String,
    pub event_data: HashMap<String, Value>,
    pub visitor_id: Option<String>,
    pub state: Option<String>,
    pub timestamp: DateTime<Utc>,
}
