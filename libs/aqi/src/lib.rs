//! AQI library
//!
//! This library provides supporting functionality for AQI calculations and
//! translations to EPA specified AQI categories and colors. It covers PM2.5,
//! PM10, ozone, NO2, SO2 and CO, and reduces simultaneous readings to the
//! dominant pollutant. It supports both std and no_std environments.
//!
//! Everything here is a pure function over static tables: no I/O, no
//! allocation, no shared mutable state.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

use serde::{Deserialize, Serialize};

mod breakpoints;
mod category;
mod dominant;
mod error;
mod pollutant;

pub use breakpoints::{compute_index, compute_index_str, BreakpointRow, BreakpointTable};
pub use category::{categorize, describe, Category, Description};
pub use dominant::{compute_dominant, DominantResult};
pub use error::AqiError;
pub use pollutant::{format_label, Pollutant, PollutantMap, Readings, Unit};

/// Color enum provides colors corresponding to EPA AQI levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Green,
    Yellow,
    Orange,
    Red,
    Purple,
    DarkPurple,
}

impl Color {
    /// Hex code of the color, as published by AirNow.
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Green => "#00E400",
            Self::Yellow => "#FFFF00",
            Self::Orange => "#FF7E00",
            Self::Red => "#FF0000",
            Self::Purple => "#8F3F97",
            Self::DarkPurple => "#7E0023",
        }
    }
}

/// The index of a single pollutant reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AqiResult {
    pub pollutant: Pollutant,
    /// The concentration the index was calculated from, as supplied.
    pub concentration: f64,
    pub index: u16,
    pub category: Category,
}

/// Calculate the index and category for one reading.
///
/// # Examples
///
/// ```
/// use aqi::{calculate, Category, Pollutant};
///
/// let result = calculate(Pollutant::Pm25, 12.0).unwrap();
/// assert_eq!(result.index, 50);
/// assert_eq!(result.category, Category::Good);
/// ```
pub fn calculate(pollutant: Pollutant, concentration: f64) -> Result<AqiResult, AqiError> {
    let index = compute_index(pollutant, concentration)?;
    Ok(AqiResult {
        pollutant,
        concentration,
        index,
        category: Category::from_index(index),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate() {
        let result = calculate(Pollutant::Pm25, 12.0).unwrap();
        assert!(result.index <= 50);
        assert_eq!(result.category, Category::Good);

        let result = calculate(Pollutant::Pm25, 35.4).unwrap();
        assert_eq!(result.index, 100);
        assert_eq!(result.category, Category::Moderate);

        let result = calculate(Pollutant::Pm25, 0.0).unwrap();
        assert_eq!(result.index, 0);
        assert_eq!(result.category, Category::Good);

        assert_eq!(
            calculate(Pollutant::Pm25, -1.0),
            Err(AqiError::InvalidConcentration(-1.0))
        );
    }

    #[test]
    fn test_every_concentration_has_a_category() {
        let concentrations = [0.0, 0.001, 1.0, 12.0, 99.9, 604.0, 1e6, 1e12, f64::MAX];
        for pollutant in Pollutant::ALL {
            for concentration in concentrations {
                let index = compute_index(pollutant, concentration).unwrap();
                assert!(categorize(i32::from(index)).is_ok());
            }
            let top = compute_index(pollutant, 1e12).unwrap();
            assert_eq!(categorize(i32::from(top)), Ok(Category::Hazardous));
        }
    }

    #[test]
    fn test_color_matches_category_order() {
        let colors: [Color; 6] = Category::ALL.map(Category::color);
        assert_eq!(
            colors,
            [
                Color::Green,
                Color::Yellow,
                Color::Orange,
                Color::Red,
                Color::Purple,
                Color::DarkPurple,
            ]
        );
    }
}
