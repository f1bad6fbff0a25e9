use std::path::PathBuf;

use log::{error, info, warn};
use mongodb::Client as MongoClient;
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::{de::DeserializeOwned, Deserialize};

use crate::model::db::SeedData;
use crate::service::text::TextService;
use crate::store::{ensure_indexes_exist, MemoryStore, MongoStore, Repository};

/// Site settings from `Rocket.toml` or `ROCKET_*` variables, kept as
/// managed state.
#[derive(Deserialize)]
pub struct Config {
    hostname: String,
}

impl Config {
    /// Used in share URLs when a request carries no `Host` header.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }
}

/// Pull one config section out of the figment, reporting why it failed.
fn extract<T: DeserializeOwned>(rocket: &Rocket<Build>, section: &str) -> Option<T> {
    match rocket.figment().extract::<T>() {
        Ok(config) => Some(config),
        Err(e) => {
            error!("Invalid {section} config");
            rocket::config::pretty_print_error(e);
            None
        }
    }
}

/// Manages [`Config`].
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        match extract::<Config>(&rocket, "application") {
            Some(config) => Ok(rocket.manage(config)),
            None => Err(rocket),
        }
    }
}

fn default_db_name() -> String {
    "voter_guide".to_string()
}

#[derive(Deserialize)]
struct DbConfig {
    /// Holds credentials when set.
    db_uri: Option<String>,
    #[serde(default = "default_db_name")]
    db_name: String,
    seed_file: Option<PathBuf>,
}

impl DbConfig {
    async fn open(self) -> Option<Repository> {
        match self.db_uri {
            Some(ref db_uri) => {
                info!("Connecting to MongoDB database `{}`", self.db_name);
                let client = MongoClient::with_uri_str(db_uri)
                    .await
                    .map_err(|e| error!("Failed to connect to database: {e}"))
                    .ok()?;
                let db = client.database(&self.db_name);
                ensure_indexes_exist(&db)
                    .await
                    .map_err(|e| error!("Failed to create indexes: {e}"))
                    .ok()?;
                info!("Database online");
                Some(Repository::new(MongoStore::new(db)))
            }
            None => {
                warn!("No `db_uri` set, using an in-memory store");
                let Some(path) = self.seed_file else {
                    return Some(Repository::new(MemoryStore::default()));
                };
                let seed = SeedData::from_file(&path)
                    .map_err(|e| error!("Failed to read seed file {}: {e}", path.display()))
                    .ok()?;
                info!(
                    "Seeded in-memory store from {} ({} ZIP codes)",
                    path.display(),
                    seed.locations.len()
                );
                Some(Repository::new(MemoryStore::seeded(seed)))
            }
        }
    }
}

/// Manages a [`Repository`]: MongoDB when `db_uri` is set, otherwise an
/// in-memory store seeded from `seed_file`.
pub struct DatabaseFairing;

#[rocket::async_trait]
impl Fairing for DatabaseFairing {
    fn info(&self) -> Info {
        Info {
            name: "Store",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        let Some(config) = extract::<DbConfig>(&rocket, "database") else {
            return Err(rocket);
        };
        match config.open().await {
            Some(repository) => Ok(rocket.manage(repository)),
            None => Err(rocket),
        }
    }
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

#[derive(Deserialize)]
struct TextConfig {
    llm_url: Option<String>,
    #[serde(default = "default_llm_model")]
    llm_model: String,
    llm_api_key: Option<String>,
}

/// Manages the [`TextService`], disabled when no `llm_url` is set.
pub struct TextServiceFairing;

#[rocket::async_trait]
impl Fairing for TextServiceFairing {
    fn info(&self) -> Info {
        Info {
            name: "Text service",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        let Some(config) = extract::<TextConfig>(&rocket, "text service") else {
            return Err(rocket);
        };
        match config.llm_url {
            Some(_) => info!("Text helpers enabled with model {}", config.llm_model),
            None => warn!("No `llm_url` set, text helpers are unavailable"),
        }
        let service = TextService::new(config.llm_url, config.llm_api_key, config.llm_model);
        Ok(rocket.manage(service))
    }
}
