use serde::{Deserialize, Serialize};

/// A state-wide proposition voters approve or reject directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotMeasure {
    pub id: String,
    pub state: String,
    pub election_year: i32,
    #[serde(default)]
    pub measure_number: Option<String>,
    pub title: String,
    #[serde(default)]
    pub short_title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub measure_type: Option<String>,
    #[serde(default)]
    pub fiscal_impact: Option<String>,
    #[serde(default)]
    pub pro_arguments: Vec<String>,
    #[serde(default)]
    pub con_arguments: Vec<String>,
}

impl BallotMeasure {
    /// The title to show where space is tight.
    pub fn display_title(&self) -> &str {
        self.short_title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.title)
    }
}
