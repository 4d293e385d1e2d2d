use crate::bay::Bay;
use crate::error::Error;
use crate::flight::Flight;
use crate::service::Service;
use crate::settings::Settings;
use crate::staff::Staff;
use log::info;
use serde::de::DeserializeOwned;
use std::path::Path;

/// One day of input: the four mandatory JSON files plus an optional
/// settings.json, all read from a single data directory.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub bays: Vec<Bay>,
    pub services: Vec<Service>,
    pub flights: Vec<Flight>,
    pub roster: Vec<Staff>,
    pub settings: Settings,
}

impl Dataset {
    pub fn load(dir: &Path) -> Result<Self, Error> {
        let bays: Vec<Bay> = read_json(&dir.join("bays.json"))?;
        let services: Vec<Service> = read_json(&dir.join("services.json"))?;
        let flights: Vec<Flight> = read_json(&dir.join("flights.json"))?;
        let roster: Vec<Staff> = read_json(&dir.join("roster.json"))?;

        let settings_path = dir.join("settings.json");
        let settings: Settings = if settings_path.exists() {
            read_json(&settings_path)?
        } else {
            Settings::default()
        };
        settings.validate()?;

        info!(
            "loaded {} bays, {} services, {} flights, {} staff from {}",
            bays.len(),
            services.len(),
            flights.len(),
            roster.len(),
            dir.display()
        );

        Ok(Dataset {
            bays,
            services,
            flights,
            roster,
            settings,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
