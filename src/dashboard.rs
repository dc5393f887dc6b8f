//! Per-city AQI summaries and their text rendering.

use std::fmt;

use aqi::{compute_dominant, describe, DominantResult, Pollutant, PollutantMap, Readings};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::City;
use crate::openaq::{Measurement, StationSnapshot};
use crate::units;

/// WHO 24-hour guideline in µg/m³, for the particulates only.
pub const fn who_guideline_24h(pollutant: Pollutant) -> Option<f64> {
    match pollutant {
        Pollutant::Pm25 => Some(15.0),
        Pollutant::Pm10 => Some(45.0),
        _ => None,
    }
}

/// The station that determined a city's index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationAqi {
    pub station_id: u64,
    pub station_name: String,
    pub result: DominantResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitySummary {
    pub city: City,
    /// Stations that answered, with or without usable data.
    pub stations: usize,
    pub updated: Option<DateTime<Utc>>,
    /// `None` when no station reported an AQI pollutant.
    pub aqi: Option<StationAqi>,
}

impl CitySummary {
    pub fn index(&self) -> Option<u16> {
        self.aqi.as_ref().map(|station| station.result.index)
    }
}

/// Builds the readings for one station: the most recent value per
/// pollutant, converted to the table unit.
///
/// Parameters that are not AQI pollutants are ignored, and values in units
/// that cannot be converted are logged and dropped.
pub fn readings(measurements: &[Measurement]) -> Readings {
    let mut latest: PollutantMap<(DateTime<Utc>, f64)> = PollutantMap::new();

    for measurement in measurements {
        let Some(pollutant) = measurement.pollutant() else {
            continue;
        };
        let value = match units::normalize(pollutant, measurement.value, &measurement.unit) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Skipping sensor {}: {e}", measurement.sensor_id);
                continue;
            }
        };

        let newer = latest
            .get(pollutant)
            .map_or(true, |(timestamp, _)| measurement.timestamp > *timestamp);
        if newer {
            latest.insert(pollutant, (measurement.timestamp, value));
        }
    }

    latest
        .iter()
        .map(|(pollutant, &(_, value))| (pollutant, value))
        .collect()
}

/// Summarize a city from its station snapshots.
///
/// The city reports the station with the highest dominant index; on a tie
/// the first station wins. A station whose readings fail to calculate is
/// logged and ignored rather than shown with a partial result.
pub fn summarize(city: &City, snapshots: &[StationSnapshot]) -> CitySummary {
    let mut worst: Option<StationAqi> = None;

    for snapshot in snapshots {
        let readings = readings(&snapshot.measurements);
        if readings.is_empty() {
            log::debug!("Station {} has no AQI pollutants", snapshot.station.id);
            continue;
        }

        let result = match compute_dominant(&readings) {
            Ok(result) => result,
            Err(e) => {
                log::warn!("Skipping station {}: {e}", snapshot.station.id);
                continue;
            }
        };

        if worst
            .as_ref()
            .map_or(true, |current| result.index > current.result.index)
        {
            worst = Some(StationAqi {
                station_id: snapshot.station.id,
                station_name: snapshot.station.name.clone(),
                result,
            });
        }
    }

    let updated = snapshots
        .iter()
        .flat_map(|snapshot| &snapshot.measurements)
        .map(|measurement| measurement.timestamp)
        .max();

    CitySummary {
        city: *city,
        stations: snapshots.len(),
        updated,
        aqi: worst,
    }
}

/// Order cities by index, worst first. Cities without data go last and
/// ties keep their original order.
pub fn rank(summaries: &mut [CitySummary]) {
    summaries.sort_by(|a, b| b.index().cmp(&a.index()));
}

/// Formats a population with thousands separators, `1,900,000`.
fn thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

impl fmt::Display for CitySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(station) = &self.aqi else {
            writeln!(f, "{}: no data", self.city.name)?;
            return writeln!(
                f,
                "  No active monitoring station reported AQI pollutants ({} checked).",
                self.stations
            );
        };

        let result = &station.result;
        let category = result.category();
        let description = describe(category);

        writeln!(
            f,
            "{}: AQI {} ({}, {})",
            self.city.name, result.index, description.name, description.hex
        )?;
        writeln!(
            f,
            "  {} | Population: {}",
            self.city.state,
            thousands(self.city.population)
        )?;
        writeln!(
            f,
            "  Dominant pollutant: {} ({}) at {}",
            result.pollutant,
            result.pollutant.full_name(),
            station.station_name
        )?;
        writeln!(f, "  {}", description.health_message)?;
        writeln!(f, "  {}", category.recommendation())?;

        write!(f, "  Stations: {}", self.stations)?;
        if let Some(updated) = self.updated {
            write!(f, " | Last updated: {}", updated.format("%Y-%m-%d %H:%M UTC"))?;
        }
        writeln!(f)?;

        for (pollutant, reading) in result.results.iter() {
            write!(
                f,
                "    {:<6} {:>8.1} {:<6} AQI {:>3}  {}",
                pollutant.label(),
                reading.concentration,
                pollutant.unit().symbol(),
                reading.index,
                reading.category.name()
            )?;
            if let Some(guideline) = who_guideline_24h(pollutant) {
                let side = if reading.concentration > guideline {
                    "above"
                } else {
                    "within"
                };
                write!(f, "  ({side} WHO 24h guideline of {guideline} µg/m³)")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Side-by-side table of ranked cities.
pub struct Comparison<'a>(pub &'a [CitySummary]);

impl fmt::Display for Comparison<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>4}  {:<16} {:>4}  Category", "Rank", "City", "AQI")?;
        let mut rank = 0;
        for summary in self.0 {
            match &summary.aqi {
                Some(station) => {
                    rank += 1;
                    writeln!(
                        f,
                        "{:>4}  {:<16} {:>4}  {}",
                        rank,
                        summary.city.name,
                        station.result.index,
                        station.result.category().name()
                    )?;
                }
                None => writeln!(f, "{:>4}  {:<16} {:>4}  No data", "-", summary.city.name, "-")?,
            }
        }
        Ok(())
    }
}
