use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::db::{CardDecision, CardTemplate, FinalizedVoterCard};

/// A request to finalize a voter card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSpec {
    pub visitor_id: String,
    pub event_id: String,
    #[serde(default)]
    pub ballot_id: Option<String>,
    pub template: CardTemplate,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub election_date: Option<NaiveDate>,
    #[serde(default)]
    pub election_type: Option<String>,
    pub decisions: Vec<CardDecision>,
    #[serde(default)]
    pub show_notes: bool,
    #[serde(default)]
    pub is_public: bool,
}

impl CardSpec {
    /// Convert this spec into a card with the given ID, shared from `host`.
    pub fn into_card(self, id: String, host: &str, now: DateTime<Utc>) -> FinalizedVoterCard {
        FinalizedVoterCard {
            share_url: FinalizedVoterCard::share_url_for(host, &id),
            id,
            visitor_id: self.visitor_id,
            event_id: self.event_id,
            ballot_id: self.ballot_id,
            template: self.template,
            location: self.location,
            state: self.state,
            election_date: self.election_date,
            election_type: self.election_type,
            decisions: self.decisions,
            show_notes: self.show_notes,
            is_public: self.is_public,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Changes to an existing card. `visitorId` must name the card's owner;
/// absent fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardUpdate {
    pub visitor_id: String,
    #[serde(default)]
    pub template: Option<CardTemplate>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub decisions: Option<Vec<CardDecision>>,
    #[serde(default)]
    pub show_notes: Option<bool>,
    #[serde(default)]
    pub is_public: Option<bool>,
}

impl CardUpdate {
    pub fn apply(self, card: &mut FinalizedVoterCard, now: DateTime<Utc>) {
        if let Some(template) = self.template {
            card.template = template;
        }
        if let Some(location) = self.location {
            card.location = location;
        }
        if let Some(decisions) = self.decisions {
            card.decisions = decisions;
        }
        if let Some(show_notes) = self.show_notes {
            card.show_notes = show_notes;
        }
        if let Some(is_public) = self.is_public {
            card.is_public = is_public;
        }
        card.updated_at = now;
    }
}

/// Who is asking, as given by the `visitorId` query parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromForm)]
pub struct Viewer {
    #[field(name = "visitorId")]
    pub visitor_id: Option<String>,
}

impl Viewer {
    pub fn visitor_id(&self) -> Option<&str> {
        self.visitor_id.as_deref()
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    use crate::model::db::LineItemKind;

    impl CardSpec {
        pub fn example(visitor_id: &str) -> Self {
            Self {
                visitor_id: visitor_id.to_string(),
                event_id: "event-ny-2026".to_string(),
                ballot_id: None,
                template: CardTemplate::Minimal,
                location: "New York, NY".to_string(),
                state: Some("NY".to_string()),
                election_date: NaiveDate::from_ymd_opt(2026, 11, 3),
                election_type: Some("general".to_string()),
                decisions: vec![CardDecision {
                    kind: LineItemKind::Measure,
                    title: "Prop 1".to_string(),
                    decision: "Yes".to_string(),
                    hidden: None,
                    note: None,
                    description: None,
                }],
                show_notes: false,
                is_public: false,
            }
        }
    }
}
