#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::Config;

use config::{ConfigFairing, DatabaseFairing, TextServiceFairing};
use logging::LoggerFairing;

/// The server, with its store and text service connected on ignition.
pub fn build() -> Rocket<Build> {
    rocket::build()
        .mount("/", api::routes())
        .register("/", api::catchers())
        .attach(ConfigFairing)
        .attach(DatabaseFairing)
        .attach(TextServiceFairing)
        .attach(LoggerFairing)
}

/// The server over a given in-memory store, with the text service disabled.
#[cfg(test)]
pub(crate) fn rocket_for_store(store: store::MemoryStore) -> Rocket<Build> {
    let figment = rocket::Config::figment().merge(("hostname", "voterguide.test"));
    rocket::custom(figment)
        .mount("/", api::routes())
        .register("/", api::catchers())
        .attach(ConfigFairing)
        .manage(service::text::TextService::disabled())
        .manage(store::Repository::new(store))
}
