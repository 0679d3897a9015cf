use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::display_mode::DisplayMode;
use super::ramp::RampSummary;

/// One half-hour slot as plotted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub start_time: NaiveDateTime,

    /// Measured whole-house load
    pub total_watts: f64,

    /// Total minus every disabled component
    pub net_watts: f64,

    /// Bar height of `net_watts` in chart pixels for the current mode's scale
    pub y_px: f64,
}

/// Chart-ready view of one navigation.
///
/// The core computes every number; the rendering surface only draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartView {
    pub title: String,

    pub mode: DisplayMode,

    /// Text for the mode picker, e.g. "Weekday average"
    pub mode_label: String,

    /// 48 points, midnight first
    pub points: Vec<ChartPoint>,

    /// SVG polyline `"x y,x y,..."` tracing solar production, when solar was fetched
    pub solar_line: Option<String>,

    pub ramps: RampSummary,

    /// Number of horizontal grid lines
    pub grid_lines: usize,
}
