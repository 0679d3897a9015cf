use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::display_mode::DisplayMode;
use super::feed::{ComponentToggle, Feed};
use super::view_state::{NavigationBounds, ViewState};
use crate::errors::CoreError;

pub const DEFAULT_API_URL: &str =
    "http://duck-curve-analysis-api.us-east-2.elasticbeanstalk.com/api";

/// Environment variable overriding [`Settings::api_url`].
pub const ENV_API_URL: &str = "DUCK_CURVE_API_URL";
/// Environment variable overriding [`Settings::request_timeout_secs`].
pub const ENV_TIMEOUT_SECS: &str = "DUCK_CURVE_TIMEOUT_SECS";

/// Explorer configuration, usually loaded from a JSON file.
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the energy API, without a trailing slash
    pub api_url: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Day shown first in `Single` mode
    pub initial_date: NaiveDate,

    /// Month averaged first in the averaged modes
    pub initial_month: NaiveDate,

    pub initial_mode: DisplayMode,

    /// Components requested at start-up
    pub components: Vec<ComponentToggle>,

    /// Range of dates the backing data covers
    pub bounds: NavigationBounds,
}

impl Default for Settings {
    fn default() -> Self {
        // The published data set covers Q4 2020.
        let start = NaiveDate::from_ymd_opt(2020, 10, 1).unwrap_or_default();
        let end = NaiveDate::from_ymd_opt(2020, 12, 31).unwrap_or_default();
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: 30,
            initial_date: end,
            initial_month: NaiveDate::from_ymd_opt(2020, 12, 1).unwrap_or_default(),
            initial_mode: DisplayMode::Weekdays,
            components: vec![ComponentToggle::new(Feed::Solar, true)],
            bounds: NavigationBounds {
                start_date: start,
                end_date: end,
            },
        }
    }
}

impl Settings {
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)
            .map_err(|e| CoreError::Config(format!("Failed to parse settings: {e}")))?;
        Ok(settings)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CoreError::FileIO(format!("Failed to read settings from {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    /// Apply `DUCK_CURVE_API_URL` / `DUCK_CURVE_TIMEOUT_SECS` if set.
    pub fn apply_env_overrides(&mut self) -> Result<(), CoreError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), CoreError> {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = raw.trim().parse().map_err(|_| {
                CoreError::Config(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"))
            })?;
        }
        Ok(())
    }

    /// Check the settings are usable. Returns the first problem found.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.api_url.trim().is_empty() {
            return Err(CoreError::Config("api_url must not be empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::Config(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.bounds.start_date > self.bounds.end_date {
            return Err(CoreError::Config(format!(
                "bounds start ({}) must not be after end ({})",
                self.bounds.start_date, self.bounds.end_date
            )));
        }
        if let Some(total) = self.components.iter().find(|c| !c.feed.is_component()) {
            return Err(CoreError::Config(format!(
                "'{}' cannot be listed as a component",
                total.feed
            )));
        }
        Ok(())
    }

    /// The view the explorer opens on.
    pub fn initial_view_state(&self) -> ViewState {
        ViewState::new(
            self.initial_mode,
            self.initial_date,
            self.initial_month,
            self.components.clone(),
        )
    }

    /// `api_url` with any trailing slashes removed.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}
