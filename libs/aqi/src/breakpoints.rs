//! EPA breakpoint tables and the index interpolation.
//!
//! Breakpoints follow the pre-2024 EPA revision, see:
//! https://document.airnow.gov/technical-assistance-document-for-the-reporting-of-daily-air-quailty.pdf

use serde::{Deserialize, Serialize};

use crate::{AqiError, Pollutant};

/// One linear segment of a pollutant's AQI step function.
///
/// Both concentration bounds and both index bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakpointRow {
    pub concentration_low: f64,
    pub concentration_high: f64,
    pub index_low: u16,
    pub index_high: u16,
}

impl BreakpointRow {
    pub const fn new(
        concentration_low: f64,
        concentration_high: f64,
        index_low: u16,
        index_high: u16,
    ) -> Self {
        Self {
            concentration_low,
            concentration_high,
            index_low,
            index_high,
        }
    }

    pub fn contains(&self, concentration: f64) -> bool {
        concentration >= self.concentration_low && concentration <= self.concentration_high
    }

    /// Interpolate the index for a concentration inside this row.
    ///
    /// Halves round away from zero, and the result never leaves the row's
    /// index range.
    ///
    /// # Examples
    ///
    /// ```
    /// use aqi::BreakpointRow;
    ///
    /// let row = BreakpointRow::new(0.0, 4.0, 0, 5);
    /// assert_eq!(row.interpolate(2.0), 3); // 2.5
    /// ```
    pub fn interpolate(&self, concentration: f64) -> u16 {
        // Linear interpolation formula transcribed from EPA documentation
        // AQI = ((AQIhigh - AQIlow) / (Chigh - Clow)) * (Cactual - Clow) + AQIlow
        let aqi = (f64::from(self.index_high - self.index_low)
            / (self.concentration_high - self.concentration_low))
            * (concentration - self.concentration_low)
            + f64::from(self.index_low);
        (libm::round(aqi) as u16).clamp(self.index_low, self.index_high)
    }
}

/// The ordered breakpoint rows for one pollutant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BreakpointTable {
    pub pollutant: Pollutant,
    /// Decimal places the table is published with. Concentrations are
    /// truncated to this precision before lookup.
    pub precision: u8,
    pub rows: &'static [BreakpointRow],
}

// Indices shared by every table.
// Good, Moderate, Unhealthy for Sensitive Groups, Unhealthy, Very Unhealthy, Hazardous

/// PM2.5, µg/m³, 24-hour
static PM25_TABLE: BreakpointTable = BreakpointTable {
    pollutant: Pollutant::Pm25,
    precision: 1,
    rows: &[
        BreakpointRow::new(0.0, 12.0, 0, 50),
        BreakpointRow::new(12.1, 35.4, 51, 100),
        BreakpointRow::new(35.5, 55.4, 101, 150),
        BreakpointRow::new(55.5, 150.4, 151, 200),
        BreakpointRow::new(150.5, 250.4, 201, 300),
        BreakpointRow::new(250.5, 500.4, 301, 500),
    ],
};

/// PM10, µg/m³, 24-hour
static PM10_TABLE: BreakpointTable = BreakpointTable {
    pollutant: Pollutant::Pm10,
    precision: 0,
    rows: &[
        BreakpointRow::new(0.0, 54.0, 0, 50),
        BreakpointRow::new(55.0, 154.0, 51, 100),
        BreakpointRow::new(155.0, 254.0, 101, 150),
        BreakpointRow::new(255.0, 354.0, 151, 200),
        BreakpointRow::new(355.0, 424.0, 201, 300),
        BreakpointRow::new(425.0, 604.0, 301, 500),
    ],
};

/// Ozone, ppb, 8-hour.
///
/// The 8-hour table ends at Very Unhealthy. Anything above 200 ppb takes the
/// index ceiling.
static OZONE_TABLE: BreakpointTable = BreakpointTable {
    pollutant: Pollutant::Ozone,
    precision: 0,
    rows: &[
        BreakpointRow::new(0.0, 54.0, 0, 50),
        BreakpointRow::new(55.0, 70.0, 51, 100),
        BreakpointRow::new(71.0, 85.0, 101, 150),
        BreakpointRow::new(86.0, 105.0, 151, 200),
        BreakpointRow::new(106.0, 200.0, 201, 300),
    ],
};

/// NO2, ppb, 1-hour
static NO2_TABLE: BreakpointTable = BreakpointTable {
    pollutant: Pollutant::No2,
    precision: 0,
    rows: &[
        BreakpointRow::new(0.0, 53.0, 0, 50),
        BreakpointRow::new(54.0, 100.0, 51, 100),
        BreakpointRow::new(101.0, 360.0, 101, 150),
        BreakpointRow::new(361.0, 649.0, 151, 200),
        BreakpointRow::new(650.0, 1249.0, 201, 300),
        BreakpointRow::new(1250.0, 2049.0, 301, 500),
    ],
};

/// SO2, ppb, 1-hour
static SO2_TABLE: BreakpointTable = BreakpointTable {
    pollutant: Pollutant::So2,
    precision: 0,
    rows: &[
        BreakpointRow::new(0.0, 35.0, 0, 50),
        BreakpointRow::new(36.0, 75.0, 51, 100),
        BreakpointRow::new(76.0, 185.0, 101, 150),
        BreakpointRow::new(186.0, 304.0, 151, 200),
        BreakpointRow::new(305.0, 604.0, 201, 300),
        BreakpointRow::new(605.0, 1004.0, 301, 500),
    ],
};

/// CO, ppm, 8-hour
static CO_TABLE: BreakpointTable = BreakpointTable {
    pollutant: Pollutant::Co,
    precision: 1,
    rows: &[
        BreakpointRow::new(0.0, 4.4, 0, 50),
        BreakpointRow::new(4.5, 9.4, 51, 100),
        BreakpointRow::new(9.5, 12.4, 101, 150),
        BreakpointRow::new(12.5, 15.4, 151, 200),
        BreakpointRow::new(15.5, 30.4, 201, 300),
        BreakpointRow::new(30.5, 50.4, 301, 500),
    ],
};

impl BreakpointTable {
    pub fn for_pollutant(pollutant: Pollutant) -> &'static BreakpointTable {
        match pollutant {
            Pollutant::Pm25 => &PM25_TABLE,
            Pollutant::Pm10 => &PM10_TABLE,
            Pollutant::Ozone => &OZONE_TABLE,
            Pollutant::No2 => &NO2_TABLE,
            Pollutant::So2 => &SO2_TABLE,
            Pollutant::Co => &CO_TABLE,
        }
    }

    /// Index reported for concentrations above the last row.
    pub const MAX_INDEX: u16 = 500;

    /// Truncate a concentration to the table's published precision.
    ///
    /// Published rows leave a gap of one reporting unit between them
    /// (12.0 then 12.1); truncation puts every value into exactly one row.
    pub fn truncate(&self, concentration: f64) -> f64 {
        let scale = libm::pow(10.0, f64::from(self.precision));
        // Relative slack for representation error such as 35.4 * 10 = 353.99...
        libm::floor(concentration * scale * (1.0 + 1e-12)) / scale
    }

    /// First row, in ascending order, containing the concentration.
    pub fn lookup(&self, concentration: f64) -> Option<&'static BreakpointRow> {
        self.rows.iter().find(|row| row.contains(concentration))
    }

    /// Calculate the index for a concentration in this table's unit.
    ///
    /// The truncated concentration selects the row; the formula runs on the
    /// concentration as given. Concentrations above the last row are capped
    /// at [`Self::MAX_INDEX`].
    pub fn index(&self, concentration: f64) -> Result<u16, AqiError> {
        if !concentration.is_finite() || concentration < 0.0 {
            return Err(AqiError::InvalidConcentration(concentration));
        }

        match self.lookup(self.truncate(concentration)) {
            Some(row) => Ok(row.interpolate(concentration)),
            None => Ok(Self::MAX_INDEX),
        }
    }
}

/// Calculate the AQI for a pollutant concentration.
///
/// # Arguments
///
/// * `pollutant` - The pollutant the concentration was measured for
/// * `concentration` - Concentration in [`Pollutant::unit`]
///
/// # Returns
///
/// The index calculated with the EPA breakpoints and formula, or
/// [`AqiError::InvalidConcentration`] for negative or non-finite input.
/// These values may be confirmed using the calculator at
/// https://www.airnow.gov/aqi/aqi-calculator-concentration/
///
/// # Examples
///
/// ```
/// use aqi::{compute_index, Pollutant};
///
/// assert_eq!(compute_index(Pollutant::Pm25, 35.4), Ok(100));
/// assert_eq!(compute_index(Pollutant::Pm25, 0.0), Ok(0));
/// assert!(compute_index(Pollutant::Pm25, -1.0).is_err());
/// ```
pub fn compute_index(pollutant: Pollutant, concentration: f64) -> Result<u16, AqiError> {
    BreakpointTable::for_pollutant(pollutant).index(concentration)
}

/// [`compute_index`] for a pollutant named by string, such as `"pm25"`.
pub fn compute_index_str(pollutant: &str, concentration: f64) -> Result<u16, AqiError> {
    compute_index(pollutant.parse()?, concentration)
}
