use log::{debug, warn};
use thiserror::Error;

use crate::model::api::DecisionsRequest;

use super::LocalStore;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
}

/// How far a recorded set of decisions got.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Saved locally and on the server.
    Synced,
    /// Saved locally only; the server copy is stale.
    LocalOnly,
}

/// The local cache key for a visitor's decisions on a ballot.
pub fn decisions_key(visitor_id: &str, ballot_id: &str) -> String {
    format!("decisions:{visitor_id}:{ballot_id}")
}

/// Records decisions locally first, then pushes them to the server.
pub struct DecisionSync {
    client: reqwest::Client,
    base_url: String,
    local: LocalStore<DecisionsRequest>,
}

impl DecisionSync {
    /// `base_url` is the server root, e.g. `http://localhost:8000`.
    pub fn new(base_url: impl Into<String>, local: LocalStore<DecisionsRequest>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            local,
        }
    }

    pub fn local(&self) -> &LocalStore<DecisionsRequest> {
        &self.local
    }

    /// The locally known decisions, whether or not they reached the server.
    pub fn decisions(&self, visitor_id: &str, ballot_id: &str) -> Option<DecisionsRequest> {
        self.local.get(&decisions_key(visitor_id, ballot_id))
    }

    /// Save locally, notifying subscribers, then try the server. A failed push
    /// is logged and leaves the local copy in place.
    pub async fn record(&self, decisions: DecisionsRequest) -> SyncOutcome {
        let key = decisions_key(&decisions.visitor_id, &decisions.ballot_id);
        self.local.set(key.clone(), decisions.clone());

        match self.push(&decisions).await {
            Ok(()) => {
                debug!("Synced {key}");
                SyncOutcome::Synced
            }
            Err(err) => {
                warn!("Failed to sync {key}, keeping the local copy: {err}");
                SyncOutcome::LocalOnly
            }
        }
    }

    /// Push the current local copy again, e.g. after a failed sync.
    pub async fn resync(&self, visitor_id: &str, ballot_id: &str) -> Option<SyncOutcome> {
        let decisions = self.decisions(visitor_id, ballot_id)?;
        Some(match self.push(&decisions).await {
            Ok(()) => SyncOutcome::Synced,
            Err(err) => {
                warn!("Failed to resync decisions for ballot {ballot_id}: {err}");
                SyncOutcome::LocalOnly
            }
        })
    }

    async fn push(&self, decisions: &DecisionsRequest) -> Result<(), SyncError> {
        let url = format!("{}/decisions", self.base_url);
        let resp = self.client.post(&url).json(decisions).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
