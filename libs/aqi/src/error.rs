use thiserror::Error;

/// Errors raised by the AQI calculations.
///
/// Every variant is a violation of the caller's side of the contract, so
/// retrying with the same input always fails the same way.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AqiError {
    /// Concentration was negative, NaN or infinite.
    #[error("invalid concentration {0}: must be finite and non-negative")]
    InvalidConcentration(f64),

    /// Pollutant name did not match any breakpoint table.
    #[error("unknown pollutant")]
    UnknownPollutant,

    /// A negative index was passed to the category lookup.
    #[error("invalid index {0}: must be non-negative")]
    InvalidIndex(i32),

    /// No readings were supplied to the dominant pollutant reduction.
    #[error("no pollutant readings supplied")]
    EmptyReadingSet,
}
