//! Stored (de/serialisable) types.
//!
//! These types are shared by every store implementation and serialise with
//! camelCase field names, matching the JSON API.

mod analytics;
pub use analytics::AnalyticsEvent;

mod ballot;
pub use ballot::{Ballot, BallotCandidate, BallotFilter, BallotRace, StoredBallot};

mod card;
pub use card::{CardDecision, CardTemplate, FinalizedVoterCard, LineItemKind};

mod decisions;
pub use decisions::{Decisions, MeasureDecision};

mod event;
pub use event::{ElectionEvent, EventStatus, Visibility};

mod location;
pub use location::{Location, ZipDistrict};

mod measure;
pub use measure::BallotMeasure;

mod race;
pub use race::{Candidate, Endorsement, Race, RaceCandidate};

mod seed;
pub use seed::SeedData;

mod user;
pub use user::User;
