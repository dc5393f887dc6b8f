//! Reduction of several simultaneous readings to one reported index.

use serde::{Deserialize, Serialize};

use crate::{calculate, AqiError, AqiResult, Category, Pollutant, PollutantMap, Readings};

/// The highest individual index among a set of readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DominantResult {
    pub pollutant: Pollutant,
    pub index: u16,
    /// Result for every pollutant that was supplied.
    pub results: PollutantMap<AqiResult>,
}

impl DominantResult {
    pub fn category(&self) -> Category {
        Category::from_index(self.index)
    }

    /// Full result of the dominant pollutant.
    pub fn dominant(&self) -> Option<&AqiResult> {
        self.results.get(self.pollutant)
    }
}

/// Calculate the index of every reading and pick the highest.
///
/// Fails as a whole if any single concentration is invalid. When several
/// pollutants share the maximum, the first in [`Pollutant::ALL`] order wins.
///
/// # Examples
///
/// ```
/// use aqi::{compute_dominant, Pollutant, Readings};
///
/// let readings = Readings::new()
///     .with(Pollutant::Pm25, 150.0)
///     .with(Pollutant::Pm10, 50.0);
/// let dominant = compute_dominant(&readings).unwrap();
/// assert_eq!(dominant.pollutant, Pollutant::Pm25);
/// assert_eq!(dominant.index, 200);
/// ```
pub fn compute_dominant(readings: &Readings) -> Result<DominantResult, AqiError> {
    let mut results = PollutantMap::new();
    let mut dominant: Option<AqiResult> = None;

    for (pollutant, &concentration) in readings.iter() {
        let result = calculate(pollutant, concentration)?;
        results.insert(pollutant, result);

        // Strictly greater, readings iterate in canonical order
        if dominant.map_or(true, |current| result.index > current.index) {
            dominant = Some(result);
        }
    }

    let dominant = dominant.ok_or(AqiError::EmptyReadingSet)?;
    Ok(DominantResult {
        pollutant: dominant.pollutant,
        index: dominant.index,
        results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pollutant() {
        let readings = Readings::new().with(Pollutant::Pm25, 35.5);
        let dominant = compute_dominant(&readings).unwrap();
        assert_eq!(dominant.pollutant, Pollutant::Pm25);
        assert_eq!(dominant.index, 101);
        assert_eq!(dominant.results.len(), 1);
        assert_eq!(dominant.dominant().map(|r| r.concentration), Some(35.5));
    }

    #[test]
    fn test_highest_index_wins() {
        let readings = Readings::new()
            .with(Pollutant::Pm25, 150.0)
            .with(Pollutant::Pm10, 50.0);
        let dominant = compute_dominant(&readings).unwrap();
        assert_eq!(dominant.pollutant, Pollutant::Pm25);
        assert_eq!(dominant.index, 200);
        assert_eq!(dominant.category(), Category::Unhealthy);

        let readings = Readings::new()
            .with(Pollutant::Pm25, 12.0)
            .with(Pollutant::Pm10, 155.0);
        let dominant = compute_dominant(&readings).unwrap();
        assert_eq!(dominant.pollutant, Pollutant::Pm10);
        assert_eq!(dominant.index, 101);
    }

    #[test]
    fn test_every_result_is_reported() {
        let readings: Readings = [
            (Pollutant::Co, 1.0),
            (Pollutant::Ozone, 60.0),
            (Pollutant::Pm25, 20.0),
        ]
        .into_iter()
        .collect();

        let dominant = compute_dominant(&readings).unwrap();
        assert_eq!(dominant.results.len(), 3);
        for (pollutant, result) in dominant.results.iter() {
            assert_eq!(result.pollutant, pollutant);
            assert_eq!(Some(&result.concentration), readings.get(pollutant));
        }
        assert!(!dominant.results.contains(Pollutant::Pm10));
    }

    #[test]
    fn test_ties_use_canonical_order() {
        // Both map to exactly 50
        let readings = Readings::new()
            .with(Pollutant::Pm10, 54.0)
            .with(Pollutant::Pm25, 12.0);

        for _ in 0..10 {
            let dominant = compute_dominant(&readings).unwrap();
            assert_eq!(dominant.index, 50);
            assert_eq!(dominant.pollutant, Pollutant::Pm25);
        }

        // Same index for ozone and CO, ozone comes first
        let readings = Readings::new()
            .with(Pollutant::Co, 4.4)
            .with(Pollutant::Ozone, 54.0);
        assert_eq!(compute_dominant(&readings).unwrap().pollutant, Pollutant::Ozone);
    }

    #[test]
    fn test_equal_concentrations_are_deterministic() {
        let readings = Readings::new()
            .with(Pollutant::Pm25, 12.0)
            .with(Pollutant::Pm10, 12.0);
        let first = compute_dominant(&readings).unwrap();
        for _ in 0..10 {
            assert_eq!(compute_dominant(&readings).unwrap(), first);
        }
        assert_eq!(first.pollutant, Pollutant::Pm25);
    }

    #[test]
    fn test_empty_readings() {
        assert_eq!(
            compute_dominant(&Readings::new()),
            Err(AqiError::EmptyReadingSet)
        );
    }

    #[test]
    fn test_invalid_reading_fails_whole_set() {
        let readings = Readings::new()
            .with(Pollutant::Pm25, 500.0)
            .with(Pollutant::No2, -3.0);
        assert_eq!(
            compute_dominant(&readings),
            Err(AqiError::InvalidConcentration(-3.0))
        );
    }

    #[test]
    fn test_serializes_breakdown() {
        let readings = Readings::new().with(Pollutant::Ozone, 70.0);
        let json = serde_json::to_value(compute_dominant(&readings).unwrap()).unwrap();
        assert_eq!(json["pollutant"], "o3");
        assert_eq!(json["index"], 100);
        assert_eq!(json["results"]["o3"]["category"], "Moderate");
    }

    #[test]
    fn test_deserializes_stored_result() {
        let json = r#"{
            "pollutant": "pm10",
            "index": 101,
            "results": {
                "pm10": {"pollutant": "pm10", "concentration": 155.0, "index": 101, "category": "UnhealthyForSensitiveGroups"},
                "pm25": {"pollutant": "pm25", "concentration": 12.0, "index": 50, "category": "Good"}
            }
        }"#;
        let stored: DominantResult = serde_json::from_str(json).unwrap();

        let readings = Readings::new()
            .with(Pollutant::Pm25, 12.0)
            .with(Pollutant::Pm10, 155.0);
        assert_eq!(stored, compute_dominant(&readings).unwrap());
    }
}
