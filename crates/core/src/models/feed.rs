use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// A named component of total household power draw.
///
/// `Total` is the measured whole-house load; the others are sub-loads
/// (or, for solar, on-site generation) that can be subtracted from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feed {
    #[serde(rename = "total")]
    Total,
    #[serde(rename = "wh")]
    WaterHeater,
    #[serde(rename = "car")]
    Car,
    #[serde(rename = "hvac")]
    Hvac,
    #[serde(rename = "solar")]
    Solar,
}

impl Feed {
    /// The optional components that can be toggled against the total.
    pub const COMPONENTS: [Feed; 4] = [Feed::Solar, Feed::WaterHeater, Feed::Car, Feed::Hvac];

    /// Path segment used by the energy API (`/{feed}/day/...`).
    pub fn path_segment(&self) -> &'static str {
        match self {
            Feed::Total => "total",
            Feed::WaterHeater => "wh",
            Feed::Car => "car",
            Feed::Hvac => "hvac",
            Feed::Solar => "solar",
        }
    }

    /// Human-readable label for legends.
    pub fn label(&self) -> &'static str {
        match self {
            Feed::Total => "Total",
            Feed::WaterHeater => "Water heater",
            Feed::Car => "Car",
            Feed::Hvac => "HVAC",
            Feed::Solar => "Solar",
        }
    }

    pub fn is_component(&self) -> bool {
        !matches!(self, Feed::Total)
    }
}

impl std::fmt::Display for Feed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

impl FromStr for Feed {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "total" => Ok(Feed::Total),
            "wh" | "water_heater" | "waterheater" => Ok(Feed::WaterHeater),
            "car" => Ok(Feed::Car),
            "hvac" => Ok(Feed::Hvac),
            "solar" => Ok(Feed::Solar),
            other => Err(CoreError::ValidationError(format!(
                "Unknown feed '{other}': expected one of total, wh, car, hvac, solar"
            ))),
        }
    }
}

/// Whether a requested component stays in the total or gets subtracted out.
///
/// Enabled components remain part of the total; disabled ones are removed
/// from it by the net-load calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentToggle {
    pub feed: Feed,
    pub enabled: bool,
}

impl ComponentToggle {
    pub fn new(feed: Feed, enabled: bool) -> Self {
        Self { feed, enabled }
    }
}
