use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::CoreError;

/// Selects between an averaged monthly profile and a single day's readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Average over the weekdays of the selected month
    #[default]
    Weekdays,
    /// Average over the weekend days of the selected month
    Weekends,
    /// Average over every day of the selected month
    All,
    /// Actual readings of the selected day
    Single,
}

impl DisplayMode {
    /// All modes in the order the mode picker lists them.
    pub const ALL: [DisplayMode; 4] = [
        DisplayMode::Weekdays,
        DisplayMode::Weekends,
        DisplayMode::All,
        DisplayMode::Single,
    ];

    pub fn path_segment(&self) -> &'static str {
        match self {
            DisplayMode::Weekdays => "weekdays",
            DisplayMode::Weekends => "weekends",
            DisplayMode::All => "all",
            DisplayMode::Single => "single",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DisplayMode::Weekdays => "Weekday average",
            DisplayMode::Weekends => "Weekend average",
            DisplayMode::All => "All days average",
            DisplayMode::Single => "Single days only",
        }
    }

    /// `true` for the month-averaged modes.
    pub fn is_average(&self) -> bool {
        !matches!(self, DisplayMode::Single)
    }
}

impl std::fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

impl FromStr for DisplayMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weekdays" => Ok(DisplayMode::Weekdays),
            "weekends" => Ok(DisplayMode::Weekends),
            "all" => Ok(DisplayMode::All),
            "single" => Ok(DisplayMode::Single),
            other => Err(CoreError::ValidationError(format!(
                "Unknown display mode '{other}': expected weekdays, weekends, all or single"
            ))),
        }
    }
}
