use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{BallotMeasure, Candidate, ElectionEvent, Endorsement, Location, Race, RaceCandidate, ZipDistrict};

/// Reference data to load into a fresh store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeedData {
    pub locations: Vec<Location>,
    pub zip_districts: Vec<ZipDistrict>,
    pub races: Vec<Race>,
    pub race_candidates: Vec<RaceCandidate>,
    pub candidates: Vec<Candidate>,
    pub endorsements: Vec<Endorsement>,
    pub measures: Vec<BallotMeasure>,
    pub events: Vec<ElectionEvent>,
}

impl SeedData {
    /// Read seed data from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(rocket::serde::json::serde_json::from_str(&raw)?)
    }
}
