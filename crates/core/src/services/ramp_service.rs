use crate::models::ramp::{RampStats, RampSummary, RampWindow};
use crate::models::series::DaySeries;

/// Characterizes the steep morning drop and evening rise of a net-load curve.
///
/// For each window the analyzer takes the signed step into every slot of the
/// window, starting from the slot just before it, and summarizes them.
pub struct RampService;

impl RampService {
    pub fn new() -> Self {
        Self
    }

    /// Stats for both the evening ramp-up and the morning ramp-down.
    pub fn analyze(&self, series: &DaySeries) -> RampSummary {
        RampSummary {
            up: self.window_stats(series, RampWindow::Up),
            down: self.window_stats(series, RampWindow::Down),
        }
    }

    pub fn window_stats(&self, series: &DaySeries, window: RampWindow) -> RampStats {
        let mut steps = Vec::with_capacity(10);
        let mut peak_rate: f64 = 0.0;
        let mut peak_fraction: f64 = 0.0;

        let mut last = series.watts(window.reference_index());
        for i in window.indices() {
            let current = series.watts(i);
            let step = current - last;
            let directional = match window {
                RampWindow::Up => step,
                RampWindow::Down => -step,
            };

            peak_rate = peak_rate.max(directional);
            peak_fraction = peak_fraction.max(fraction_of_baseline(directional, last));

            steps.push(step);
            last = current;
        }

        RampStats {
            window,
            extreme: signed_extreme(&steps).unwrap_or(0.0),
            average: mean(&steps).unwrap_or(0.0),
            median: median(&steps).unwrap_or(0.0),
            peak_rate,
            peak_rate_percent: (peak_fraction * 100.0).floor() as i64,
            steps,
        }
    }
}

impl Default for RampService {
    fn default() -> Self {
        Self::new()
    }
}

/// `change / |baseline|`, with a zero baseline contributing 0.
pub fn fraction_of_baseline(change: f64, baseline: f64) -> f64 {
    if baseline == 0.0 {
        0.0
    } else {
        change / baseline.abs()
    }
}

/// Value with the largest magnitude, sign kept. The first one wins on ties.
pub fn signed_extreme(values: &[f64]) -> Option<f64> {
    let mut iter = values.iter().copied();
    let first = iter.next()?;
    Some(iter.fold(first, |best, v| if v.abs() > best.abs() { v } else { best }))
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Numeric median: middle value, or the mean of the two middle values for
/// an even count.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
