use aqi::{AqiError, Pollutant};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "OpenAQ API key not configured. Get a free key at https://explore.openaq.org/register \
         and set OPENAQ_API_KEY"
    )]
    MissingApiKey,

    #[error("invalid value {value:?} for {key}")]
    InvalidSetting { key: &'static str, value: String },

    #[error("unknown city: {0}")]
    UnknownCity(String),

    #[error("unsupported unit {unit:?} for {pollutant}")]
    UnsupportedUnit { pollutant: Pollutant, unit: String },

    #[error("OpenAQ returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("unexpected OpenAQ response: {0}")]
    UnexpectedResponse(&'static str),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Aqi(#[from] AqiError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
