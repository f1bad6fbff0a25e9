use serde::{Deserialize, Serialize};

/// A visitor's stance on a ballot measure.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionValue {
    Yes,
    No,
    Undecided,
}

impl DecisionValue {
    /// Human-readable form used on voter cards.
    pub fn label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::Undecided => "Undecided",
        }
    }
}
