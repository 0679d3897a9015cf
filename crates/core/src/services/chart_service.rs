use crate::models::chart::{ChartPoint, ChartView};
use crate::models::display_mode::DisplayMode;
use crate::models::ramp::RampSummary;
use crate::models::series::DaySeries;
use crate::models::view_state::ViewState;
use crate::providers::energy_api::format_api_date;

/// Horizontal grid lines drawn behind the bars.
pub const GRID_LINES: usize = 15;

/// Watts per pixel for month-averaged profiles.
const AVERAGE_WATTS_PER_PX: f64 = 12.0;
/// Watts per pixel for single days, which peak much higher.
const SINGLE_WATTS_PER_PX: f64 = 40.0;

// Solar overlay geometry (SVG user units).
const SOLAR_FIRST_SLOT: usize = 14;
const SOLAR_END_SLOT: usize = 39;
const SLOT_WIDTH_PX: f64 = 25.0;
const PLOT_LEFT_PX: f64 = 65.0;
const PLOT_BASELINE_PX: f64 = 282.0;

/// Turns computed series into chart-ready data.
///
/// The core computes every coordinate so that the rendering surface only draws.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    pub fn build_view(
        &self,
        state: &ViewState,
        total: &DaySeries,
        net: &DaySeries,
        solar: Option<&DaySeries>,
        ramps: RampSummary,
    ) -> ChartView {
        let mode = state.display_mode;
        let points = total
            .points()
            .iter()
            .zip(net.points())
            .map(|(t, n)| ChartPoint {
                start_time: t.start_time,
                total_watts: t.average_power_watts,
                net_watts: n.average_power_watts,
                y_px: watts_to_pixels(mode, n.average_power_watts),
            })
            .collect();

        ChartView {
            title: chart_title(state),
            mode,
            mode_label: mode.label().to_string(),
            points,
            solar_line: solar.map(solar_polyline),
            ramps,
            grid_lines: GRID_LINES,
        }
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

/// Scale watts to chart pixels for `mode`.
pub fn watts_to_pixels(mode: DisplayMode, watts: f64) -> f64 {
    if mode.is_average() {
        watts / AVERAGE_WATTS_PER_PX
    } else {
        watts / SINGLE_WATTS_PER_PX
    }
}

/// SVG polyline points for the daylight slots of a solar profile.
///
/// The overlay is always drawn on the averaged scale.
pub fn solar_polyline(solar: &DaySeries) -> String {
    (SOLAR_FIRST_SLOT..SOLAR_END_SLOT)
        .map(|i| {
            let x = i as f64 * SLOT_WIDTH_PX + PLOT_LEFT_PX;
            let y = PLOT_BASELINE_PX - solar.watts(i) / AVERAGE_WATTS_PER_PX;
            format!("{x} {y}")
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// e.g. "December 2020 · Weekday average" or "2020-12-31 · Single day".
pub fn chart_title(state: &ViewState) -> String {
    if state.display_mode.is_average() {
        format!(
            "{} · {}",
            state.current_month.format("%B %Y"),
            state.display_mode.label()
        )
    } else {
        format!("{} · Single day", format_api_date(state.current_date))
    }
}
