use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered username, bound to the visitor that claimed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub visitor_id: String,
    pub created_at: DateTime<Utc>,
}
