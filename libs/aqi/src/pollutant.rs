//! Pollutant identifiers and a small fixed-size map keyed by them.

use core::fmt;
use core::marker::PhantomData;
use core::str::FromStr;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::AqiError;

/// The pollutants covered by the EPA breakpoint tables.
///
/// Declaration order is the canonical order used to break ties between
/// pollutants with the same index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    Pm25,
    Pm10,
    #[serde(rename = "o3", alias = "ozone")]
    Ozone,
    No2,
    So2,
    Co,
}

/// Units the breakpoint tables are published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    MicrogramsPerCubicMetre,
    PartsPerBillion,
    PartsPerMillion,
}

impl Unit {
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::MicrogramsPerCubicMetre => "µg/m³",
            Self::PartsPerBillion => "ppb",
            Self::PartsPerMillion => "ppm",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Pollutant {
    /// Number of supported pollutants.
    pub const COUNT: usize = 6;

    /// All pollutants, in canonical order.
    pub const ALL: [Pollutant; Self::COUNT] = [
        Self::Pm25,
        Self::Pm10,
        Self::Ozone,
        Self::No2,
        Self::So2,
        Self::Co,
    ];

    const fn ordinal(self) -> usize {
        self as usize
    }

    /// Short machine key, as used by the OpenAQ parameter names.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Pm25 => "pm25",
            Self::Pm10 => "pm10",
            Self::Ozone => "o3",
            Self::No2 => "no2",
            Self::So2 => "so2",
            Self::Co => "co",
        }
    }

    /// Display label, with chemical subscripts for the gases.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pm25 => "PM2.5",
            Self::Pm10 => "PM10",
            Self::Ozone => "O₃",
            Self::No2 => "NO₂",
            Self::So2 => "SO₂",
            Self::Co => "CO",
        }
    }

    pub const fn full_name(self) -> &'static str {
        match self {
            Self::Pm25 => "Particulate Matter 2.5",
            Self::Pm10 => "Particulate Matter 10",
            Self::Ozone => "Ozone",
            Self::No2 => "Nitrogen Dioxide",
            Self::So2 => "Sulfur Dioxide",
            Self::Co => "Carbon Monoxide",
        }
    }

    /// Unit that concentrations must be expressed in before calculating.
    ///
    /// Converting provider units is the caller's job.
    pub const fn unit(self) -> Unit {
        match self {
            Self::Pm25 | Self::Pm10 => Unit::MicrogramsPerCubicMetre,
            Self::Ozone | Self::No2 | Self::So2 => Unit::PartsPerBillion,
            Self::Co => Unit::PartsPerMillion,
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Pollutant {
    type Err = AqiError;

    /// Parses provider spellings such as `pm25`, `PM2.5`, `pm_10` or `ozone`.
    /// Case, `.`, `_`, `-` and spaces are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut buf = [0u8; 8];
        let mut len = 0;
        for byte in s.bytes() {
            if matches!(byte, b'.' | b'_' | b'-' | b' ') {
                continue;
            }
            if len == buf.len() {
                return Err(AqiError::UnknownPollutant);
            }
            buf[len] = byte.to_ascii_lowercase();
            len += 1;
        }

        match &buf[..len] {
            b"pm25" => Ok(Self::Pm25),
            b"pm10" => Ok(Self::Pm10),
            b"o3" | b"ozone" => Ok(Self::Ozone),
            b"no2" => Ok(Self::No2),
            b"so2" => Ok(Self::So2),
            b"co" => Ok(Self::Co),
            _ => Err(AqiError::UnknownPollutant),
        }
    }
}

/// Format a raw pollutant name for display.
///
/// # Examples
///
/// ```
/// assert_eq!(aqi::format_label("pm25"), Ok("PM2.5"));
/// assert_eq!(aqi::format_label("o3"), Ok("O₃"));
/// assert_eq!(aqi::format_label("pm1"), Err(aqi::AqiError::UnknownPollutant));
/// ```
pub fn format_label(name: &str) -> Result<&'static str, AqiError> {
    name.parse::<Pollutant>().map(Pollutant::label)
}

/// A map with one optional slot per pollutant.
///
/// Iteration always follows the canonical pollutant order, independent of
/// insertion order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollutantMap<T> {
    slots: [Option<T>; Pollutant::COUNT],
}

/// Concentrations keyed by pollutant, already in each pollutant's table unit.
pub type Readings = PollutantMap<f64>;

impl<T> PollutantMap<T> {
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
        }
    }

    /// Set the value for `pollutant`, returning the previous one.
    pub fn insert(&mut self, pollutant: Pollutant, value: T) -> Option<T> {
        self.slots[pollutant.ordinal()].replace(value)
    }

    /// Builder form of [`PollutantMap::insert`].
    pub fn with(mut self, pollutant: Pollutant, value: T) -> Self {
        self.insert(pollutant, value);
        self
    }

    pub fn get(&self, pollutant: Pollutant) -> Option<&T> {
        self.slots[pollutant.ordinal()].as_ref()
    }

    pub fn remove(&mut self, pollutant: Pollutant) -> Option<T> {
        self.slots[pollutant.ordinal()].take()
    }

    pub fn contains(&self, pollutant: Pollutant) -> bool {
        self.slots[pollutant.ordinal()].is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pollutant, &T)> + '_ {
        Pollutant::ALL
            .iter()
            .zip(self.slots.iter())
            .filter_map(|(&pollutant, slot)| slot.as_ref().map(|value| (pollutant, value)))
    }
}

impl<T> Default for PollutantMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Later entries replace earlier ones for the same pollutant.
impl<T> FromIterator<(Pollutant, T)> for PollutantMap<T> {
    fn from_iter<I: IntoIterator<Item = (Pollutant, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (pollutant, value) in iter {
            map.insert(pollutant, value);
        }
        map
    }
}

impl<T: Serialize> Serialize for PollutantMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (pollutant, value) in self.iter() {
            map.serialize_entry(&pollutant, value)?;
        }
        map.end()
    }
}

struct PollutantMapVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for PollutantMapVisitor<T> {
    type Value = PollutantMap<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map keyed by pollutant")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = PollutantMap::new();
        while let Some((pollutant, value)) = access.next_entry::<Pollutant, T>()? {
            map.insert(pollutant, value);
        }
        Ok(map)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for PollutantMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PollutantMapVisitor(PhantomData))
    }
}
