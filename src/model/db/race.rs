use serde::{Deserialize, Serialize};

/// A contested office up for election within one district.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Race {
    pub id: String,
    pub election_year: i32,
    pub state: String,
    pub race_type: String,
    pub office: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub primary_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub district_id: String,
}

/// Join row between a race and a candidate running in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceCandidate {
    pub race_id: String,
    pub candidate_id: String,
    #[serde(default)]
    pub primary_votes: Option<i64>,
    #[serde(default)]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub is_won_primary: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub last_name: String,
    #[serde(default)]
    pub suffix: Option<String>,
    #[serde(default)]
    pub party: Option<String>,
    #[serde(default)]
    pub incumbent_status: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
}

impl Candidate {
    /// Full name as printed on a ballot, e.g. "Maria T. Alvarez Jr.".
    pub fn display_name(&self) -> String {
        [
            Some(self.first_name.as_str()),
            self.middle_name.as_deref(),
            Some(self.last_name.as_str()),
            self.suffix.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// An organisation's endorsement of a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endorsement {
    pub candidate_id: String,
    pub organization: String,
    #[serde(default)]
    pub endorsement_type: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}
