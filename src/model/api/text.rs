use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasCheckRequest {
    pub text: String,
}

/// The text service's judgement of a passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiasVerdict {
    pub biased: bool,
    pub explanation: String,
}

/// A ballot measure rewritten in plain language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedMeasure {
    pub measure_id: String,
    pub simplified: String,
}
