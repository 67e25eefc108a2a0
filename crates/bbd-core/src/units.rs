//! Unit-system label sets for rendered measures.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which unit labels to render. The server reports plain numbers; this only
/// affects display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

/// Display labels for the four measured quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitLabels {
    pub volume: &'static str,
    pub weight: &'static str,
    pub length: &'static str,
    pub temp: &'static str,
}

impl UnitSystem {
    pub const fn labels(&self) -> UnitLabels {
        match self {
            Self::Metric => UnitLabels {
                volume: "mL",
                weight: "kg",
                length: "cm",
                temp: "\u{b0}C",
            },
            Self::Imperial => UnitLabels {
                volume: "oz",
                weight: "lb",
                length: "in",
                temp: "\u{b0}F",
            },
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error type for unknown unit system strings.
#[derive(Debug, Clone, Error)]
#[error("unknown unit system: {0} (expected metric or imperial)")]
pub struct UnknownUnitSystem(String);

impl FromStr for UnitSystem {
    type Err = UnknownUnitSystem;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "metric" => Ok(Self::Metric),
            "imperial" => Ok(Self::Imperial),
            _ => Err(UnknownUnitSystem(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_labels() {
        let labels = UnitSystem::Metric.labels();
        assert_eq!(labels.volume, "mL");
        assert_eq!(labels.weight, "kg");
        assert_eq!(labels.length, "cm");
        assert_eq!(labels.temp, "\u{b0}C");
    }

    #[test]
    fn imperial_labels() {
        let labels = UnitSystem::Imperial.labels();
        assert_eq!(labels.volume, "oz");
        assert_eq!(labels.temp, "\u{b0}F");
    }

    #[test]
    fn serde_roundtrip_is_lowercase() {
        let json = serde_json::to_string(&UnitSystem::Imperial).unwrap();
        assert_eq!(json, "\"imperial\"");
        let parsed: UnitSystem = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, UnitSystem::Imperial);
    }

    #[test]
    fn parse_rejects_unknown() {
        assert!("metric".parse::<UnitSystem>().is_ok());
        assert!("stone".parse::<UnitSystem>().is_err());
    }
}
