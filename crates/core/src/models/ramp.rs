use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// The two fixed windows the analyzer scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RampWindow {
    /// Evening ramp-up: slots 31–40 (15:30–20:30), referenced against slot 30
    Up,
    /// Morning ramp-down: slots 13–22 (06:30–11:30), referenced against slot 12
    Down,
}

impl RampWindow {
    /// Slots whose step into them is measured.
    pub fn indices(&self) -> RangeInclusive<usize> {
        match self {
            RampWindow::Up => 31..=40,
            RampWindow::Down => 13..=22,
        }
    }

    /// The slot just before the window; the first step is measured from it.
    pub fn reference_index(&self) -> usize {
        *self.indices().start() - 1
    }
}

impl std::fmt::Display for RampWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RampWindow::Up => write!(f, "ramp-up"),
            RampWindow::Down => write!(f, "ramp-down"),
        }
    }
}

/// Statistics over one window's step changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RampStats {
    pub window: RampWindow,

    /// Signed step differences `v[i] - v[i-1]`, one per window slot
    pub steps: Vec<f64>,

    /// Step with the largest magnitude, sign preserved (first one on ties)
    pub extreme: f64,

    /// Arithmetic mean of `steps`
    pub average: f64,

    /// Median of `steps`
    pub median: f64,

    /// Steepest move in the window's direction (rise for `Up`, drop for `Down`), never negative
    pub peak_rate: f64,

    /// Steepest directional move relative to the preceding slot, floored to whole percent
    pub peak_rate_percent: i64,
}

/// Ramp statistics for both windows of one net-load series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RampSummary {
    pub up: RampStats,
    pub down: RampStats,
}
