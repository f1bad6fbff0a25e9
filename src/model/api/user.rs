use serde::{Deserialize, Serialize};

/// A request to claim a username for a visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegistration {
    pub username: String,
    pub visitor_id: String,
}
