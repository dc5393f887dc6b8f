//! Air quality dashboard for Brazilian cities.
//!
//! Stations and their latest readings come from the OpenAQ v3 API; indices
//! are calculated with the [`aqi`] crate.

pub mod config;
pub mod dashboard;
mod error;
pub mod openaq;
pub mod units;

pub use error::{Error, Result};
