//! AQI categories and their display metadata.

use serde::{Deserialize, Serialize};

use crate::{AqiError, Color};

/// The six EPA categories, from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// 0-50
    Good,
    /// 51-100
    Moderate,
    /// 101-150
    UnhealthyForSensitiveGroups,
    /// 151-200
    Unhealthy,
    /// 201-300
    VeryUnhealthy,
    /// 301 and above
    Hazardous,
}

/// Everything the presentation layer needs to show a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Description {
    pub name: &'static str,
    pub color: Color,
    pub hex: &'static str,
    pub health_message: &'static str,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Self::Good,
        Self::Moderate,
        Self::UnhealthyForSensitiveGroups,
        Self::Unhealthy,
        Self::VeryUnhealthy,
        Self::Hazardous,
    ];

    /// Category for an index produced by the calculations.
    ///
    /// Uses the ranges provided by the EPA; anything above 500 is still
    /// Hazardous.
    pub const fn from_index(aqi: u16) -> Self {
        match aqi {
            0..=50 => Self::Good,
            51..=100 => Self::Moderate,
            101..=150 => Self::UnhealthyForSensitiveGroups,
            151..=200 => Self::Unhealthy,
            201..=300 => Self::VeryUnhealthy,
            _ => Self::Hazardous,
        }
    }

    pub const fn index_low(self) -> u16 {
        match self {
            Self::Good => 0,
            Self::Moderate => 51,
            Self::UnhealthyForSensitiveGroups => 101,
            Self::Unhealthy => 151,
            Self::VeryUnhealthy => 201,
            Self::Hazardous => 301,
        }
    }

    /// Upper bound of the band, `None` for the open-ended top band.
    pub const fn index_high(self) -> Option<u16> {
        match self {
            Self::Good => Some(50),
            Self::Moderate => Some(100),
            Self::UnhealthyForSensitiveGroups => Some(150),
            Self::Unhealthy => Some(200),
            Self::VeryUnhealthy => Some(300),
            Self::Hazardous => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
        }
    }

    pub const fn color(self) -> Color {
        match self {
            Self::Good => Color::Green,
            Self::Moderate => Color::Yellow,
            Self::UnhealthyForSensitiveGroups => Color::Orange,
            Self::Unhealthy => Color::Red,
            Self::VeryUnhealthy => Color::Purple,
            Self::Hazardous => Color::DarkPurple,
        }
    }

    pub const fn health_message(self) -> &'static str {
        match self {
            Self::Good => {
                "Air quality is satisfactory, and air pollution poses little or no risk."
            }
            Self::Moderate => {
                "Air quality is acceptable. However, there may be a risk for some people \
                 who are unusually sensitive to air pollution."
            }
            Self::UnhealthyForSensitiveGroups => {
                "Members of sensitive groups may experience health effects. \
                 The general public is less likely to be affected."
            }
            Self::Unhealthy => {
                "Some members of the general public may experience health effects; \
                 members of sensitive groups may experience more serious health effects."
            }
            Self::VeryUnhealthy => {
                "Health alert: The risk of health effects is increased for everyone."
            }
            Self::Hazardous => {
                "Health warning of emergency conditions: everyone is more likely to be affected."
            }
        }
    }

    /// Short activity advice shown next to the index.
    pub const fn recommendation(self) -> &'static str {
        match self {
            Self::Good => "Enjoy outdoor activities!",
            Self::Moderate => "Sensitive individuals should limit prolonged outdoor exertion.",
            Self::UnhealthyForSensitiveGroups => "Sensitive groups should reduce outdoor activity.",
            Self::Unhealthy => "Everyone should reduce outdoor activity.",
            Self::VeryUnhealthy | Self::Hazardous => "Avoid all outdoor activities!",
        }
    }
}

/// Resolve the category for an index.
///
/// Indices may come from outside the calculations (deserialized data for
/// example), so negative values are rejected here rather than assumed away.
///
/// # Examples
///
/// ```
/// use aqi::{categorize, AqiError, Category};
///
/// assert_eq!(categorize(42), Ok(Category::Good));
/// assert_eq!(categorize(999), Ok(Category::Hazardous));
/// assert_eq!(categorize(-1), Err(AqiError::InvalidIndex(-1)));
/// ```
pub fn categorize(index: i32) -> Result<Category, AqiError> {
    if index < 0 {
        return Err(AqiError::InvalidIndex(index));
    }
    Ok(Category::from_index(
        u16::try_from(index).unwrap_or(u16::MAX),
    ))
}

pub const fn describe(category: Category) -> Description {
    let color = category.color();
    Description {
        name: category.name(),
        color,
        hex: color.hex(),
        health_message: category.health_message(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_index() {
        assert_eq!(Category::from_index(0), Category::Good);
        assert_eq!(Category::from_index(25), Category::Good);
        assert_eq!(Category::from_index(50), Category::Good);
        assert_eq!(Category::from_index(51), Category::Moderate);
        assert_eq!(Category::from_index(75), Category::Moderate);
        assert_eq!(Category::from_index(100), Category::Moderate);
        assert_eq!(Category::from_index(101), Category::UnhealthyForSensitiveGroups);
        assert_eq!(Category::from_index(125), Category::UnhealthyForSensitiveGroups);
        assert_eq!(Category::from_index(150), Category::UnhealthyForSensitiveGroups);
        assert_eq!(Category::from_index(151), Category::Unhealthy);
        assert_eq!(Category::from_index(175), Category::Unhealthy);
        assert_eq!(Category::from_index(200), Category::Unhealthy);
        assert_eq!(Category::from_index(201), Category::VeryUnhealthy);
        assert_eq!(Category::from_index(250), Category::VeryUnhealthy);
        assert_eq!(Category::from_index(300), Category::VeryUnhealthy);
        assert_eq!(Category::from_index(301), Category::Hazardous);
        assert_eq!(Category::from_index(400), Category::Hazardous);
        assert_eq!(Category::from_index(500), Category::Hazardous);
        assert_eq!(Category::from_index(999), Category::Hazardous);
    }

    #[test]
    fn test_categorize() {
        assert_eq!(categorize(0), Ok(Category::Good));
        assert_eq!(categorize(350), Ok(Category::Hazardous));
        assert_eq!(categorize(i32::MAX), Ok(Category::Hazardous));
        assert_eq!(categorize(-10), Err(AqiError::InvalidIndex(-10)));
    }

    #[test]
    fn test_bands_are_contiguous() {
        assert_eq!(Category::ALL[0].index_low(), 0);
        for pair in Category::ALL.windows(2) {
            let high = pair[0].index_high().unwrap();
            assert_eq!(pair[1].index_low(), high + 1);
            assert_eq!(Category::from_index(high), pair[0]);
            assert_eq!(Category::from_index(high + 1), pair[1]);
        }
        assert_eq!(Category::Hazardous.index_high(), None);
    }

    #[test]
    fn test_describe() {
        let cases = [
            (25, "Good", "#00E400"),
            (75, "Moderate", "#FFFF00"),
            (125, "Unhealthy for Sensitive Groups", "#FF7E00"),
            (175, "Unhealthy", "#FF0000"),
            (250, "Very Unhealthy", "#8F3F97"),
            (350, "Hazardous", "#7E0023"),
        ];

        for (aqi, name, hex) in cases {
            let description = describe(Category::from_index(aqi));
            assert_eq!(description.name, name);
            assert_eq!(description.hex, hex);
            assert!(!description.health_message.is_empty());
        }
    }

    #[test]
    fn test_describe_serializes_for_display() {
        let json = serde_json::to_value(describe(Category::Good)).unwrap();
        assert_eq!(json["name"], "Good");
        assert_eq!(json["color"], "Green");
        assert_eq!(json["hex"], "#00E400");
    }
}
