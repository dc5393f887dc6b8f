//! Conversion of provider units into the units the AQI tables expect.
//!
//! Gas conversions assume 25 °C and 1 atm, where one mole of gas occupies
//! 24.45 litres.

use aqi::{Pollutant, Unit};

use crate::{Error, Result};

const MOLAR_VOLUME: f64 = 24.45;

/// Units seen in provider payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceUnit {
    MicrogramsPerCubicMetre,
    MilligramsPerCubicMetre,
    PartsPerBillion,
    PartsPerMillion,
}

impl SourceUnit {
    pub fn parse(raw: &str) -> Option<Self> {
        // OpenAQ mixes the micro sign (U+00B5) and greek mu (U+03BC)
        let normalized = raw
            .trim()
            .to_lowercase()
            .replace(['µ', 'μ'], "u")
            .replace('³', "3");

        match normalized.as_str() {
            "ug/m3" => Some(Self::MicrogramsPerCubicMetre),
            "mg/m3" => Some(Self::MilligramsPerCubicMetre),
            "ppb" => Some(Self::PartsPerBillion),
            "ppm" => Some(Self::PartsPerMillion),
            _ => None,
        }
    }
}

fn molecular_weight(pollutant: Pollutant) -> Option<f64> {
    match pollutant {
        Pollutant::Pm25 | Pollutant::Pm10 => None,
        Pollutant::Ozone => Some(48.00),
        Pollutant::No2 => Some(46.01),
        Pollutant::So2 => Some(64.07),
        Pollutant::Co => Some(28.01),
    }
}

/// Convert `value`, given in `unit`, to [`Pollutant::unit`].
pub fn normalize(pollutant: Pollutant, value: f64, unit: &str) -> Result<f64> {
    let unsupported = || Error::UnsupportedUnit {
        pollutant,
        unit: unit.to_string(),
    };
    let source = SourceUnit::parse(unit).ok_or_else(unsupported)?;

    // ppb per µg/m³ for gases
    let gas_factor = || {
        molecular_weight(pollutant)
            .map(|weight| MOLAR_VOLUME / weight)
            .ok_or_else(unsupported)
    };

    let converted = match (pollutant.unit(), source) {
        (Unit::MicrogramsPerCubicMetre, SourceUnit::MicrogramsPerCubicMetre) => value,
        (Unit::MicrogramsPerCubicMetre, SourceUnit::MilligramsPerCubicMetre) => value * 1000.0,
        (Unit::MicrogramsPerCubicMetre, _) => return Err(unsupported()),

        (Unit::PartsPerBillion, SourceUnit::PartsPerBillion) => value,
        (Unit::PartsPerBillion, SourceUnit::PartsPerMillion) => value * 1000.0,
        (Unit::PartsPerBillion, SourceUnit::MicrogramsPerCubicMetre) => value * gas_factor()?,
        (Unit::PartsPerBillion, SourceUnit::MilligramsPerCubicMetre) => {
            value * 1000.0 * gas_factor()?
        }

        (Unit::PartsPerMillion, SourceUnit::PartsPerMillion) => value,
        (Unit::PartsPerMillion, SourceUnit::PartsPerBillion) => value / 1000.0,
        (Unit::PartsPerMillion, SourceUnit::MicrogramsPerCubicMetre) => {
            value * gas_factor()? / 1000.0
        }
        (Unit::PartsPerMillion, SourceUnit::MilligramsPerCubicMetre) => value * gas_factor()?,
    };
    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_parse_unit() {
        assert_eq!(SourceUnit::parse("µg/m³"), Some(SourceUnit::MicrogramsPerCubicMetre));
        assert_eq!(SourceUnit::parse("μg/m³"), Some(SourceUnit::MicrogramsPerCubicMetre));
        assert_eq!(SourceUnit::parse("ug/m3"), Some(SourceUnit::MicrogramsPerCubicMetre));
        assert_eq!(SourceUnit::parse("mg/m³"), Some(SourceUnit::MilligramsPerCubicMetre));
        assert_eq!(SourceUnit::parse(" PPB "), Some(SourceUnit::PartsPerBillion));
        assert_eq!(SourceUnit::parse("ppm"), Some(SourceUnit::PartsPerMillion));
        assert_eq!(SourceUnit::parse("particles/cm³"), None);
        assert_eq!(SourceUnit::parse("c"), None);
    }

    #[test]
    fn test_same_unit_passes_through() {
        assert_eq!(normalize(Pollutant::Pm25, 12.5, "µg/m³").unwrap(), 12.5);
        assert_eq!(normalize(Pollutant::Ozone, 40.0, "ppb").unwrap(), 40.0);
        assert_eq!(normalize(Pollutant::Co, 1.2, "ppm").unwrap(), 1.2);
    }

    #[test]
    fn test_scale_conversions() {
        assert!(close(normalize(Pollutant::Pm10, 0.05, "mg/m³").unwrap(), 50.0));
        assert!(close(normalize(Pollutant::No2, 0.1, "ppm").unwrap(), 100.0));
        assert!(close(normalize(Pollutant::Co, 500.0, "ppb").unwrap(), 0.5));
    }

    #[test]
    fn test_mass_to_mixing_ratio() {
        // 1 ppb of O3 is about 1.963 µg/m³
        assert!(close(normalize(Pollutant::Ozone, 48.0, "µg/m³").unwrap(), 24.45));
        assert!(close(normalize(Pollutant::So2, 64.07, "µg/m³").unwrap(), 24.45));
        assert!(close(normalize(Pollutant::Co, 28010.0, "µg/m³").unwrap(), 24.45));
        assert!(close(normalize(Pollutant::Co, 28.01, "mg/m³").unwrap(), 24.45));
    }

    #[test]
    fn test_unsupported() {
        assert!(matches!(
            normalize(Pollutant::Pm25, 3.0, "ppm"),
            Err(Error::UnsupportedUnit { pollutant: Pollutant::Pm25, .. })
        ));
        assert!(matches!(
            normalize(Pollutant::Ozone, 3.0, "particles/cm³"),
            Err(Error::UnsupportedUnit { unit, .. }) if unit == "particles/cm³"
        ));
    }
}
