use std::fmt::Write;

use duck_curve_core::models::chart::ChartView;
use duck_curve_core::models::ramp::RampStats;
use duck_curve_core::models::view_state::{NavigationBounds, ViewState};

/// Widest bar in the text chart, in characters.
const BAR_WIDTH: f64 = 40.0;

/// Render a chart as plain text: title, per-slot bars, ramp statistics.
pub fn render_chart(view: &ChartView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.title);
    let _ = writeln!(out, "{}", "=".repeat(view.title.chars().count()));

    let peak = view
        .points
        .iter()
        .map(|p| p.net_watts.abs())
        .fold(0.0_f64, f64::max);

    for point in &view.points {
        let len = if peak > 0.0 {
            (point.net_watts.abs() / peak * BAR_WIDTH).round() as usize
        } else {
            0
        };
        let bar = if point.net_watts < 0.0 { "-" } else { "#" }.repeat(len);
        let _ = writeln!(
            out,
            "{} {:>8.0} W {:>8.0} W  {bar}",
            point.start_time.format("%H:%M"),
            point.total_watts,
            point.net_watts,
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", render_ramp(&view.ramps.down));
    let _ = writeln!(out, "{}", render_ramp(&view.ramps.up));
    out
}

fn render_ramp(stats: &RampStats) -> String {
    format!(
        "{:<9}  extreme {:>7.0} W  mean {:>7.1} W  median {:>7.1} W  peak {:>6.0} W ({}%)",
        stats.window.to_string(),
        stats.extreme,
        stats.average,
        stats.median,
        stats.peak_rate,
        stats.peak_rate_percent,
    )
}

/// One-line hint of which navigation keys lead to covered data.
pub fn render_navigation(state: &ViewState, bounds: &NavigationBounds) -> String {
    let mark = |ok: bool, key: &str| if ok { key.to_string() } else { format!("({key})") };
    let components = state
        .components
        .iter()
        .map(|c| format!("{}:{}", c.feed, if c.enabled { "on" } else { "off" }))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "[{} {} {} {}] mode={} components=[{}]",
        mark(bounds.can_go_previous_day(state), "p"),
        mark(bounds.can_go_next_day(state), "n"),
        mark(bounds.can_go_previous_month(state), "P"),
        mark(bounds.can_go_next_month(state), "N"),
        state.display_mode,
        components,
    )
}
