//! OpenAQ module
//!
//! This module provides supporting functionality for data retrieval from
//! the OpenAQ v3 API and for turning its responses into stations and
//! measurements.
//!
//! The `latest` endpoint only reports sensor ids, so measurements are joined
//! against the sensor list of the station they were read from.

use aqi::Pollutant;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{City, Settings};
use crate::{Error, Result};

/// Latitude/longitude pair as reported by OpenAQ.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLocation {
    pub id: u64,
    pub name: Option<String>,
    pub locality: Option<String>,
    pub country: Option<RawCountry>,
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub sensors: Vec<RawSensor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCountry {
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSensor {
    pub id: u64,
    pub parameter: RawParameter,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawParameter {
    pub name: String,
    pub units: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLatest {
    pub sensors_id: u64,
    pub value: Option<f64>,
    pub datetime: Option<RawDateTime>,
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDateTime {
    pub utc: Option<DateTime<Utc>>,
}

/// A monitoring station near one of the configured cities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub id: u64,
    pub name: String,
    pub city: String,
    pub country: String,
    pub coordinates: Option<Coordinates>,
    pub sensors: Vec<Sensor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sensor {
    pub id: u64,
    pub parameter: String,
    pub units: String,
}

impl Station {
    pub fn sensor(&self, id: u64) -> Option<&Sensor> {
        self.sensors.iter().find(|sensor| sensor.id == id)
    }
}

/// One latest value reported by a station's sensor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub station_id: u64,
    pub sensor_id: u64,
    /// Parameter name as reported by OpenAQ, e.g. `pm25` or `temperature`.
    pub parameter: String,
    pub value: f64,
    pub unit: String,
    pub timestamp: DateTime<Utc>,
}

impl Measurement {
    /// The AQI pollutant this measurement is for, if any.
    pub fn pollutant(&self) -> Option<Pollutant> {
        self.parameter.parse().ok()
    }
}

/// Validates the envelope of a v3 response. Every v3 endpoint wraps its
/// payload as `{"meta": {...}, "results": [...]}`.
///
/// # Arguments
///
/// * `body` - The decoded JSON body
///
/// # Returns
///
/// Result of Ok(_) or an Err describing what is missing.
pub fn validate_envelope(body: &Value) -> Result<()> {
    let object = body
        .as_object()
        .ok_or(Error::UnexpectedResponse("body is not a JSON object"))?;

    match object.get("results") {
        Some(Value::Array(_)) => Ok(()),
        Some(_) => Err(Error::UnexpectedResponse("results is not an array")),
        None => {
            let keys: Vec<&str> = object.keys().map(String::as_str).collect();
            log::warn!("Unexpected v3 response structure: {keys:?}");
            Err(Error::UnexpectedResponse("missing results"))
        }
    }
}

/// Parses the `results` array of a validated response.
pub fn parse_results<T: DeserializeOwned>(mut body: Value) -> Result<Vec<T>> {
    validate_envelope(&body)?;
    let results = body["results"].take();
    Ok(serde_json::from_value(results)?)
}

/// Turns raw locations into stations.
///
/// With `city` set, stations whose locality (or name, when there is no
/// locality) does not mention the city are dropped. Stations without a name
/// are skipped.
pub fn process_locations(raw: Vec<RawLocation>, city: Option<&str>) -> Vec<Station> {
    let total = raw.len();
    let wanted = city.map(str::to_lowercase);

    let stations: Vec<Station> = raw
        .into_iter()
        .filter_map(|location| {
            let locality = location.locality.clone().or_else(|| location.name.clone());

            if let (Some(wanted), Some(locality)) = (&wanted, &locality) {
                if !locality.to_lowercase().contains(wanted.as_str()) {
                    return None;
                }
            }

            let Some(name) = location.name else {
                log::warn!("Skipping location {} without a name", location.id);
                return None;
            };

            Some(Station {
                id: location.id,
                name,
                city: locality.unwrap_or_else(|| "Unknown".into()),
                country: location
                    .country
                    .and_then(|country| country.code)
                    .unwrap_or_else(|| "BR".into()),
                coordinates: location.coordinates,
                sensors: location
                    .sensors
                    .into_iter()
                    .map(|sensor| Sensor {
                        id: sensor.id,
                        parameter: sensor.parameter.name,
                        units: sensor.parameter.units,
                    })
                    .collect(),
            })
        })
        .collect();

    log::info!("Processed {} valid locations from {total} raw items", stations.len());
    stations
}

/// Joins a station's latest values with its sensors.
///
/// Values that are null, undated, or from a sensor the station did not list
/// are skipped.
pub fn process_latest(raw: Vec<RawLatest>, station: &Station) -> Vec<Measurement> {
    let measurements: Vec<Measurement> = raw
        .into_iter()
        .filter_map(|latest| {
            let value = latest.value?;
            let timestamp = latest.datetime.and_then(|datetime| datetime.utc)?;
            let Some(sensor) = station.sensor(latest.sensors_id) else {
                log::debug!(
                    "Station {} reported unknown sensor {}",
                    station.id,
                    latest.sensors_id
                );
                return None;
            };

            Some(Measurement {
                station_id: station.id,
                sensor_id: sensor.id,
                parameter: sensor.parameter.clone(),
                value,
                unit: sensor.units.clone(),
                timestamp,
            })
        })
        .collect();

    log::debug!(
        "Processed {} measurements for station {}",
        measurements.len(),
        station.id
    );
    measurements
}

/// A station together with its latest measurements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationSnapshot {
    pub station: Station,
    pub measurements: Vec<Measurement>,
}

/// Headers sent with every request. Requests are bodiless GETs.
fn default_headers(api_key: &str) -> Result<HeaderMap> {
    let mut key = HeaderValue::from_str(api_key).map_err(|_| Error::InvalidSetting {
        key: "OPENAQ_API_KEY",
        value: "<redacted>".into(),
    })?;
    key.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert("x-api-key", key);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// Client for the OpenAQ v3 API.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    search_radius: u32,
    location_limit: u32,
    stations_per_city: usize,
}

impl Client {
    pub fn new(settings: &Settings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .default_headers(default_headers(settings.api_key()?)?)
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: settings.base_url.clone(),
            search_radius: settings.search_radius,
            location_limit: settings.location_limit,
            stations_per_city: settings.stations_per_city,
        })
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}{path}", self.base_url);
        log::debug!("GET {url} {query:?}");

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();
        log::debug!("{url} responded {status}");

        if !status.is_success() {
            match status.as_u16() {
                401 => log::error!("API key authentication failed - check OPENAQ_API_KEY"),
                429 => log::warn!("Rate limit exceeded for {url}"),
                code if code >= 500 => log::error!("Server error {code} for {url}"),
                code => log::error!("HTTP error {code} for {url}"),
            }
            return Err(Error::Status {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.json().await?)
    }

    /// Fetches locations within the configured radius of a point.
    pub async fn locations_near(&self, coordinates: Coordinates) -> Result<Vec<RawLocation>> {
        log::info!(
            "Fetching locations near ({}, {}) within {}m",
            coordinates.latitude,
            coordinates.longitude,
            self.search_radius
        );
        let query = [
            (
                "coordinates",
                format!("{},{}", coordinates.latitude, coordinates.longitude),
            ),
            ("radius", self.search_radius.to_string()),
            ("limit", self.location_limit.to_string()),
        ];
        let body = self.get("/locations", &query).await?;
        parse_results(body)
    }

    /// Fetches the latest value of every sensor at a location.
    pub async fn latest(&self, location_id: u64) -> Result<Vec<RawLatest>> {
        let body = self.get(&format!("/locations/{location_id}/latest"), &[]).await?;
        parse_results(body)
    }

    /// Collects stations near a city and their latest measurements.
    ///
    /// Only the first `stations_per_city` matching stations are queried. A
    /// station whose latest values cannot be fetched is logged and left out;
    /// failing to list stations fails the city.
    pub async fn collect_city(&self, city: &City) -> Result<Vec<StationSnapshot>> {
        log::info!("Starting data collection for {}", city.name);

        let coordinates = Coordinates {
            latitude: city.latitude,
            longitude: city.longitude,
        };
        let raw = self.locations_near(coordinates).await?;
        let mut stations = process_locations(raw, Some(city.name));
        if stations.len() > self.stations_per_city {
            log::debug!(
                "Querying {} of {} stations for {}",
                self.stations_per_city,
                stations.len(),
                city.name
            );
            stations.truncate(self.stations_per_city);
        }

        let mut snapshots = Vec::with_capacity(stations.len());
        for station in stations {
            match self.latest(station.id).await {
                Ok(raw) => {
                    let measurements = process_latest(raw, &station);
                    snapshots.push(StationSnapshot {
                        station,
                        measurements,
                    });
                }
                Err(e) => {
                    log::warn!("Failed to fetch latest data for location {}: {e}", station.id)
                }
            }
        }

        log::info!(
            "Data collection complete for {} | Stations: {}",
            city.name,
            snapshots.len()
        );
        Ok(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_envelope() {
        assert!(validate_envelope(&json!({"meta": {}, "results": []})).is_ok());
        assert!(matches!(
            validate_envelope(&json!({"detail": "Not found"})),
            Err(Error::UnexpectedResponse("missing results"))
        ));
        assert!(matches!(
            validate_envelope(&json!({"results": {}})),
            Err(Error::UnexpectedResponse("results is not an array"))
        ));
        assert!(matches!(
            validate_envelope(&json!([1, 2, 3])),
            Err(Error::UnexpectedResponse("body is not a JSON object"))
        ));
    }

    #[test]
    fn test_default_headers() {
        let headers = default_headers("abc123").unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["x-api-key"], "abc123");
        assert!(headers["x-api-key"].is_sensitive());
        assert_eq!(headers[ACCEPT], "application/json");
        assert!(!headers.contains_key(reqwest::header::CONTENT_TYPE));

        assert!(matches!(
            default_headers("bad\nkey"),
            Err(Error::InvalidSetting { key: "OPENAQ_API_KEY", .. })
        ));
    }

    #[test]
    fn test_client_from_settings() {
        let settings = Settings::from_vars([
            ("OPENAQ_API_KEY", "abc123"),
            ("AERIS_STATIONS_PER_CITY", "3"),
        ])
        .unwrap();
        let client = Client::new(&settings).unwrap();
        assert_eq!(client.stations_per_city, 3);
        assert_eq!(client.base_url, "https://api.openaq.org/v3");

        let settings = Settings::from_vars([("OPENAQ_API_KEY", "abc123")]).unwrap();
        assert_eq!(Client::new(&settings).unwrap().stations_per_city, 5);

        assert!(matches!(
            Client::new(&Settings::default()),
            Err(Error::MissingApiKey)
        ));
    }

    #[test]
    fn test_measurement_pollutant() {
        let measurement = Measurement {
            station_id: 1,
            sensor_id: 2,
            parameter: "pm25".into(),
            value: 10.0,
            unit: "µg/m³".into(),
            timestamp: Utc::now(),
        };
        assert_eq!(measurement.pollutant(), Some(Pollutant::Pm25));

        let measurement = Measurement {
            parameter: "relativehumidity".into(),
            ..measurement
        };
        assert_eq!(measurement.pollutant(), None);
    }
}
