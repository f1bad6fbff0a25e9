//! The client-side mirror of a visitor's decisions.
//!
//! Decisions live in a local observable cache first, so interested views see
//! changes immediately; the server copy is a best-effort sync target.

mod local_store;
mod sync;

pub use local_store::{LocalStore, Snapshot, Subscription};
pub use sync::{decisions_key, DecisionSync, SyncError, SyncOutcome};
