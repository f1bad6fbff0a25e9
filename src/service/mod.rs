//! The voter guide logic, written against the [`Store`](crate::store::Store)
//! interface so it runs unchanged over any backing store.

pub mod aggregator;
pub mod analytics;
pub mod cache;
pub mod cards;
pub mod decisions;
pub mod events;
pub mod resolver;
pub mod text;
pub mod users;
