use std::collections::HashSet;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use rocket::tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::model::db::{
    AnalyticsEvent, BallotFilter, BallotMeasure, Candidate, Decisions, ElectionEvent, Endorsement,
    FinalizedVoterCard, Location, Race, RaceCandidate, SeedData, StoredBallot, User, ZipDistrict,
};

use super::Store;

#[derive(Default)]
struct Tables {
    locations: Vec<Location>,
    zip_districts: Vec<ZipDistrict>,
    races: Vec<Race>,
    race_candidates: Vec<RaceCandidate>,
    candidates: Vec<Candidate>,
    endorsements: Vec<Endorsement>,
    measures: Vec<BallotMeasure>,
    ballots: Vec<StoredBallot>,
    events: Vec<ElectionEvent>,
    decisions: Vec<Decisions>,
    cards: Vec<FinalizedVoterCard>,
    users: Vec<User>,
    analytics: Vec<AnalyticsEvent>,
}

impl From<SeedData> for Tables {
    fn from(seed: SeedData) -> Self {
        Self {
            locations: seed.locations,
            zip_districts: seed.zip_districts,
            races: seed.races,
            race_candidates: seed.race_candidates,
            candidates: seed.candidates,
            endorsements: seed.endorsements,
            measures: seed.measures,
            events: seed.events,
            ..Default::default()
        }
    }
}

/// Simulated outages.
#[derive(Default)]
struct Faults {
    offline: AtomicBool,
    ballot_writes: AtomicBool,
}

/// An in-process store. Rows keep insertion order.
/// Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    faults: Arc<Faults>,
}

impl MemoryStore {
    /// A store preloaded with reference data.
    pub fn seeded(seed: SeedData) -> Self {
        Self {
            tables: Arc::new(RwLock::new(seed.into())),
            faults: Default::default(),
        }
    }

    /// Make every operation fail, as if the database were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.faults.offline.store(offline, Ordering::Relaxed);
    }

    /// Make ballot cache writes fail while reads keep working.
    pub fn set_ballot_writes_failing(&self, failing: bool) {
        self.faults.ballot_writes.store(failing, Ordering::Relaxed);
    }

    /// Every analytics event recorded so far, oldest first.
    pub async fn analytics(&self) -> Vec<AnalyticsEvent> {
        self.tables.read().await.analytics.clone()
    }

    fn check(&self) -> Result<()> {
        if self.faults.offline.load(Ordering::Relaxed) {
            Err(Error::Storage("memory store is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Replace the first row matching `same`, returning whether one did.
fn replace<T: Clone>(rows: &mut [T], row: &T, same: impl Fn(&T) -> bool) -> bool {
    match rows.iter_mut().find(|r| same(r)) {
        Some(existing) => {
            *existing = row.clone();
            true
        }
        None => false,
    }
}

#[rocket::async_trait]
impl Store for MemoryStore {
    async fn location(&self, zipcode: &str) -> Result<Option<Location>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables.locations.iter().find(|l| l.zipcode == zipcode).cloned())
    }

    async fn district_ids(&self, zipcode: &str) -> Result<Vec<String>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables
            .zip_districts
            .iter()
            .filter(|l| l.zipcode == zipcode)
            .map(|l| l.district_id.clone())
            .collect())
    }

    async fn races_in_district(&self, district_id: &str) -> Result<Vec<Race>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables
            .races
            .iter()
            .filter(|r| r.district_id == district_id)
            .cloned()
            .collect())
    }

    async fn races_in_state(&self, state: &str) -> Result<Vec<Race>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables.races.iter().filter(|r| r.state == state).cloned().collect())
    }

    async fn race(&self, race_id: &str) -> Result<Option<Race>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables.races.iter().find(|r| r.id == race_id).cloned())
    }

    async fn race_candidates(&self, race_id: &str) -> Result<Vec<RaceCandidate>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables
            .race_candidates
            .iter()
            .filter(|l| l.race_id == race_id)
            .cloned()
            .collect())
    }

    async fn candidates(&self, ids: &[String]) -> Result<Vec<Candidate>> {
        self.check()?;
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let tables = self.tables.read().await;
        Ok(tables
            .candidates
            .iter()
            .filter(|c| wanted.contains(c.id.as_str()))
            .cloned()
            .collect())
    }

    async fn endorsements(&self, candidate_id: &str) -> Result<Vec<Endorsement>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables
            .endorsements
            .iter()
            .filter(|e| e.candidate_id == candidate_id)
            .cloned()
            .collect())
    }

    async fn measures_in_state(&self, state: &str) -> Result<Vec<BallotMeasure>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables.measures.iter().filter(|m| m.state == state).cloned().collect())
    }

    async fn measure(&self, measure_id: &str) -> Result<Option<BallotMeasure>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables.measures.iter().find(|m| m.id == measure_id).cloned())
    }

    async fn insert_ballot_once(&self, ballot: &StoredBallot) -> Result<bool> {
        self.check()?;
        if self.faults.ballot_writes.load(Ordering::Relaxed) {
            return Err(Error::Storage("ballot table rejected the write".to_string()));
        }
        let mut tables = self.tables.write().await;
        if tables.ballots.iter().any(|b| b.id == ballot.id) {
            return Ok(false);
        }
        tables.ballots.push(ballot.clone());
        Ok(true)
    }

    async fn ballot(&self, id: &str) -> Result<Option<StoredBallot>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables.ballots.iter().find(|b| b.id == id).cloned())
    }

    async fn ballots(&self, filter: &BallotFilter) -> Result<Vec<StoredBallot>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables
            .ballots
            .iter()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect())
    }

    async fn replace_ballot(&self, ballot: &StoredBallot) -> Result<bool> {
        self.check()?;
        let mut tables = self.tables.write().await;
        Ok(replace(&mut tables.ballots, ballot, |b| b.id == ballot.id))
    }

    async fn events(&self, archived: bool) -> Result<Vec<ElectionEvent>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables
            .events
            .iter()
            .filter(|e| !e.is_deleted() && e.archived == archived)
            .cloned()
            .collect())
    }

    async fn events_in_state(&self, state: &str) -> Result<Vec<ElectionEvent>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables
            .events
            .iter()
            .filter(|e| !e.is_deleted() && e.state == state)
            .cloned()
            .collect())
    }

    async fn event(&self, id: &str) -> Result<Option<ElectionEvent>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables.events.iter().find(|e| e.id == id).cloned())
    }

    async fn insert_event(&self, event: &ElectionEvent) -> Result<()> {
        self.check()?;
        let mut tables = self.tables.write().await;
        if tables.events.iter().any(|e| e.id == event.id) {
            return Err(Error::Storage(format!("duplicate event ID {}", event.id)));
        }
        tables.events.push(event.clone());
        Ok(())
    }

    async fn replace_event(&self, event: &ElectionEvent) -> Result<bool> {
        self.check()?;
        let mut tables = self.tables.write().await;
        Ok(replace(&mut tables.events, event, |e| e.id == event.id))
    }

    async fn save_decisions(&self, decisions: &Decisions) -> Result<()> {
        self.check()?;
        let mut tables = self.tables.write().await;
        let same = |d: &Decisions| {
            d.visitor_id == decisions.visitor_id && d.ballot_id == decisions.ballot_id
        };
        if !replace(&mut tables.decisions, decisions, same) {
            tables.decisions.push(decisions.clone());
        }
        Ok(())
    }

    async fn decisions(&self, visitor_id: &str, ballot_id: &str) -> Result<Option<Decisions>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables
            .decisions
            .iter()
            .find(|d| d.visitor_id == visitor_id && d.ballot_id == ballot_id)
            .cloned())
    }

    async fn insert_card(&self, card: &FinalizedVoterCard) -> Result<()> {
        self.check()?;
        let mut tables = self.tables.write().await;
        if tables.cards.iter().any(|c| c.id == card.id) {
            return Err(Error::Storage(format!("duplicate card ID {}", card.id)));
        }
        tables.cards.push(card.clone());
        Ok(())
    }

    async fn card(&self, id: &str) -> Result<Option<FinalizedVoterCard>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables.cards.iter().find(|c| c.id == id).cloned())
    }

    async fn replace_card(&self, card: &FinalizedVoterCard) -> Result<bool> {
        self.check()?;
        let mut tables = self.tables.write().await;
        Ok(replace(&mut tables.cards, card, |c| c.id == card.id))
    }

    async fn public_cards(&self, visitor_id: &str) -> Result<Vec<FinalizedVoterCard>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables
            .cards
            .iter()
            .filter(|c| c.is_public && c.visitor_id == visitor_id)
            .cloned()
            .collect())
    }

    async fn user(&self, username: &str) -> Result<Option<User>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<bool> {
        self.check()?;
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == user.username) {
            return Ok(false);
        }
        tables.users.push(user.clone());
        Ok(true)
    }

    async fn record(&self, event: &AnalyticsEvent) -> Result<()> {
        self.check()?;
        self.tables.write().await.analytics.push(event.clone());
        Ok(())
    }
}
