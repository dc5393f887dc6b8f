//! Settings and the fixed set of monitored cities.
//!
//! Settings come from the environment, with a `.env` file loaded first if
//! present.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openaq.org/v3";

/// OpenAQ rejects location searches wider than this, in metres.
pub const MAX_SEARCH_RADIUS: u32 = 25_000;

/// OpenAQ page size ceiling.
pub const MAX_LOCATION_LIMIT: u32 = 1_000;

const API_KEY_PLACEHOLDER: &str = "your_api_key_here";

/// A monitored city.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct City {
    pub name: &'static str,
    pub state: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    /// 1 is the highest priority (best data availability).
    pub priority: u8,
    pub population: u32,
}

pub static CITIES: [City; 8] = [
    City {
        name: "São Paulo",
        state: "SP",
        latitude: -23.5505,
        longitude: -46.6333,
        priority: 1,
        population: 12_300_000,
    },
    City {
        name: "Rio de Janeiro",
        state: "RJ",
        latitude: -22.9068,
        longitude: -43.1729,
        priority: 2,
        population: 6_700_000,
    },
    City {
        name: "Belo Horizonte",
        state: "MG",
        latitude: -19.9167,
        longitude: -43.9345,
        priority: 3,
        population: 2_500_000,
    },
    City {
        name: "Curitiba",
        state: "PR",
        latitude: -25.4284,
        longitude: -49.2733,
        priority: 4,
        population: 1_900_000,
    },
    City {
        name: "Brasília",
        state: "DF",
        latitude: -15.8267,
        longitude: -47.9218,
        priority: 5,
        population: 3_000_000,
    },
    City {
        name: "Salvador",
        state: "BA",
        latitude: -12.9714,
        longitude: -38.5014,
        priority: 6,
        population: 2_900_000,
    },
    City {
        name: "Fortaleza",
        state: "CE",
        latitude: -3.7172,
        longitude: -38.5433,
        priority: 7,
        population: 2_600_000,
    },
    City {
        name: "Porto Alegre",
        state: "RS",
        latitude: -30.0346,
        longitude: -51.2177,
        priority: 8,
        population: 1_500_000,
    },
];

/// Look up a city by name, ignoring case.
pub fn city(name: &str) -> Result<&'static City> {
    let wanted = name.trim().to_lowercase();
    CITIES
        .iter()
        .find(|city| city.name.to_lowercase() == wanted)
        .ok_or_else(|| Error::UnknownCity(name.to_string()))
}

/// Cities up to and including `max_priority`, highest priority first.
pub fn priority_cities(max_priority: u8) -> impl Iterator<Item = &'static City> {
    CITIES.iter().filter(move |city| city.priority <= max_priority)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
    /// Radius around a city's coordinates to search for stations, in metres.
    pub search_radius: u32,
    pub location_limit: u32,
    /// Stations per city whose latest values are fetched.
    pub stations_per_city: usize,
    /// Cities reported when none are named on the command line.
    pub max_priority: u8,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.into(),
            timeout: Duration::from_secs(10),
            search_radius: MAX_SEARCH_RADIUS,
            location_limit: 100,
            stations_per_city: 5,
            max_priority: 4,
            log_level: "info".into(),
        }
    }
}

impl Settings {
    /// Load `.env` if it exists, then read settings from the environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Build settings from key/value pairs. Unset or empty keys keep their
    /// defaults.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !v.trim().is_empty())
            .collect();
        let defaults = Self::default();

        let api_key = vars
            .get("OPENAQ_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| key != API_KEY_PLACEHOLDER);

        let timeout_secs = parse_var(&vars, "OPENAQ_TIMEOUT", defaults.timeout.as_secs())?;
        let search_radius = parse_var(&vars, "OPENAQ_SEARCH_RADIUS", defaults.search_radius)?;
        let location_limit = parse_var(&vars, "OPENAQ_LOCATION_LIMIT", defaults.location_limit)?;
        let stations_per_city =
            parse_var(&vars, "AERIS_STATIONS_PER_CITY", defaults.stations_per_city)?;

        Ok(Self {
            api_key,
            base_url: vars
                .get("OPENAQ_API_BASE_URL")
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            timeout: Duration::from_secs(timeout_secs),
            search_radius: search_radius.min(MAX_SEARCH_RADIUS),
            location_limit: location_limit.clamp(1, MAX_LOCATION_LIMIT),
            stations_per_city: stations_per_city.max(1),
            max_priority: parse_var(&vars, "AERIS_MAX_PRIORITY", defaults.max_priority)?,
            log_level: vars
                .get("LOG_LEVEL")
                .map(|level| level.trim().to_lowercase())
                .unwrap_or(defaults.log_level),
        })
    }

    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or(Error::MissingApiKey)
    }
}

fn parse_var<T: FromStr>(vars: &HashMap<String, String>, key: &'static str, default: T) -> Result<T> {
    match vars.get(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| Error::InvalidSetting {
            key,
            value: raw.clone(),
        }),
    }
}
