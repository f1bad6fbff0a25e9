use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Visual templates a voter card can be rendered with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardTemplate {
    Minimal,
    Bold,
    Professional,
}

/// What a card line item refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineItemKind {
    Measure,
    Candidate,
}

/// One display-ready row on a voter card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDecision {
    #[serde(rename = "type")]
    pub kind: LineItemKind,
    pub title: String,
    pub decision: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A shareable, frozen summary of a visitor's decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedVoterCard {
    pub id: String,
    /// The owner. Only this visitor may edit the card, or read it while private.
    pub visitor_id: String,
    pub event_id: String,
    pub ballot_id: Option<String>,
    pub template: CardTemplate,
    pub location: String,
    pub state: Option<String>,
    pub election_date: Option<NaiveDate>,
    pub election_type: Option<String>,
    pub decisions: Vec<CardDecision>,
    pub show_notes: bool,
    pub is_public: bool,
    /// The share URL under the host the card was created on.
    pub share_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FinalizedVoterCard {
    pub fn share_url_for(host: &str, id: &str) -> String {
        format!("https://{host}/card/{id}")
    }

    pub fn is_owned_by(&self, visitor_id: &str) -> bool {
        self.visitor_id == visitor_id
    }

    /// Public cards are readable by anyone; private ones only by their owner.
    pub fn is_readable_by(&self, visitor_id: Option<&str>) -> bool {
        self.is_public || visitor_id.map_or(false, |v| self.is_owned_by(v))
    }

    /// Point the share URL at the given host, so a card created under one
    /// host still resolves when served from another.
    pub fn served_from(mut self, host: &str) -> Self {
        self.share_url = Self::share_url_for(host, &self.id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_rules() {
        let mut card = FinalizedVoterCard::example("visitor-v");
        assert!(card.is_readable_by(Some("visitor-v")));
        assert!(!card.is_readable_by(Some("visitor-w")));
        assert!(!card.is_readable_by(None));

        card.is_public = true;
        assert!(card.is_readable_by(Some("visitor-w")));
        assert!(card.is_readable_by(None));
        assert!(!card.is_owned_by("visitor-w"));
    }

    #[test]
    fn share_url_follows_host() {
        let card = FinalizedVoterCard::example("visitor-v");
        let id = card.id.clone();
        assert_eq!(card.share_url, format!("https://voterguide.test/card/{id}"));

        let moved = card.served_from("guide.example.org");
        assert_eq!(moved.share_url, format!("https://guide.example.org/card/{id}"));
    }

    #[test]
    fn line_item_wire_format() {
        use rocket::serde::json::{json, serde_json};

        let item: CardDecision = serde_json::from_value(json!({
            "type": "measure",
            "title": "Prop 1",
            "decision": "Yes",
        }))
        .unwrap();
        assert_eq!(item.kind, LineItemKind::Measure);
        assert_eq!(item.hidden, None);
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"type": "measure", "title": "Prop 1", "decision": "Yes"})
        );

        assert!(serde_json::from_value::<CardDecision>(json!({
            "type": "proposition",
            "title": "Prop 1",
            "decision": "Yes",
        }))
        .is_err());
        assert!(serde_json::from_value::<CardTemplate>(json!("fancy")).is_err());
    }
}
