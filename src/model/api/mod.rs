//! API-compatible types.
//!
//! Request bodies, response shapes and request guards. Field names are
//! serialised in camelCase, like the stored types.

mod analytics;
pub use analytics::AnalyticsRequest;

mod ballot;
pub use ballot::{BallotResponse, BallotUpdate, LocationLookup, RaceCandidates, StateRaces};

mod card;
pub use card::{CardSpec, CardUpdate, Viewer};

mod decisions;
pub use decisions::DecisionsRequest;

mod event;
pub use event::EventSpec;

mod host;
pub use host::RequestHost;

mod text;
pub use text::{BiasCheckRequest, BiasVerdict, SimplifiedMeasure};

mod user;
pub use user::UserRegistration;
