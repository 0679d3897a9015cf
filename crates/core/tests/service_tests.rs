// ═══════════════════════════════════════════════════════════════════
// Service Tests — NetLoadService, RampService, FetchService, ChartService
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

use duck_curve_core::errors::CoreError;
use duck_curve_core::models::datapoint::Datapoint;
use duck_curve_core::models::display_mode::DisplayMode;
use duck_curve_core::models::feed::{ComponentToggle, Feed};
use duck_curve_core::models::ramp::RampWindow;
use duck_curve_core::models::series::DaySeries;
use duck_curve_core::models::view_state::{FetchRequest, ViewState};
use duck_curve_core::providers::traits::FeedProvider;
use duck_curve_core::services::chart_service::{
    chart_title, solar_polyline, watts_to_pixels, ChartService, GRID_LINES,
};
use duck_curve_core::services::fetch_service::FetchService;
use duck_curve_core::services::net_load_service::{ComponentSeries, NetLoadService};
use duck_curve_core::services::ramp_service::RampService;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn raw_points(len: usize, watts: impl Fn(usize) -> f64) -> Vec<Datapoint> {
    let midnight = d(2020, 12, 1).and_hms_opt(0, 0, 0).unwrap();
    (0..len)
        .map(|i| Datapoint::new(midnight + Duration::minutes(30 * i as i64), watts(i)))
        .collect()
}

fn series(feed: Feed, watts: impl Fn(usize) -> f64) -> DaySeries {
    DaySeries::new(feed, raw_points(48, watts)).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Mock Provider
// ═══════════════════════════════════════════════════════════════════

/// Serves a fixed profile per feed and records every call it receives.
struct MockFeedProvider {
    profiles: HashMap<Feed, Vec<Datapoint>>,
    calls: Mutex<Vec<String>>,
}

impl MockFeedProvider {
    fn new() -> Self {
        let mut profiles = HashMap::new();
        profiles.insert(Feed::Total, raw_points(48, |_| 1000.0));
        profiles.insert(Feed::WaterHeater, raw_points(48, |_| 200.0));
        profiles.insert(Feed::Car, raw_points(48, |_| 300.0));
        profiles.insert(Feed::Solar, raw_points(48, |i| if (14..38).contains(&i) { 500.0 } else { 0.0 }));
        Self {
            profiles,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn with_profile(mut self, feed: Feed, points: Vec<Datapoint>) -> Self {
        self.profiles.insert(feed, points);
        self
    }

    fn lookup(&self, feed: Feed) -> Result<Vec<Datapoint>, CoreError> {
        self.profiles.get(&feed).cloned().ok_or_else(|| CoreError::Api {
            provider: "Mock".into(),
            message: format!("Server returned code 404 for {feed}"),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedProvider for MockFeedProvider {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn get_average(
        &self,
        feed: Feed,
        mode: DisplayMode,
        month_start: NaiveDate,
    ) -> Result<Vec<Datapoint>, CoreError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("average {feed} {mode} {month_start}"));
        self.lookup(feed)
    }

    async fn get_day(&self, feed: Feed, date: NaiveDate) -> Result<Vec<Datapoint>, CoreError> {
        self.calls.lock().unwrap().push(format!("day {feed} {date}"));
        self.lookup(feed)
    }

    async fn get_solar(&self) -> Result<Vec<Datapoint>, CoreError> {
        self.calls.lock().unwrap().push("solar".to_string());
        self.lookup(Feed::Solar)
    }
}

/// Never answers; only cancellation ends a fetch against it.
struct HangingProvider;

#[async_trait]
impl FeedProvider for HangingProvider {
    fn name(&self) -> &str {
        "Hanging"
    }

    async fn get_average(
        &self,
        _feed: Feed,
        _mode: DisplayMode,
        _month_start: NaiveDate,
    ) -> Result<Vec<Datapoint>, CoreError> {
        std::future::pending().await
    }

    async fn get_day(&self, _feed: Feed, _date: NaiveDate) -> Result<Vec<Datapoint>, CoreError> {
        std::future::pending().await
    }

    async fn get_solar(&self) -> Result<Vec<Datapoint>, CoreError> {
        std::future::pending().await
    }
}

// ═══════════════════════════════════════════════════════════════════
// NetLoadService
// ═══════════════════════════════════════════════════════════════════

mod net_load {
    use super::*;

    #[test]
    fn subtracts_only_disabled_components() {
        let total = series(Feed::Total, |i| 1000.0 + i as f64);
        let wh = series(Feed::WaterHeater, |_| 200.0);
        let car = series(Feed::Car, |i| i as f64);
        let solar = series(Feed::Solar, |i| if i == 24 { 700.0 } else { 0.0 });

        let components = [
            ComponentSeries { feed: Feed::WaterHeater, enabled: false, series: Some(&wh) },
            ComponentSeries { feed: Feed::Car, enabled: true, series: Some(&car) },
            ComponentSeries { feed: Feed::Solar, enabled: false, series: Some(&solar) },
        ];
        let net = NetLoadService::new().calculate_net_load(&total, &components);

        for i in 0..48 {
            let expected = total.watts(i) - wh.watts(i) - solar.watts(i);
            assert_eq!(net.watts(i), expected, "slot {i}");
        }
        assert_eq!(net.watts(24), 1024.0 - 200.0 - 700.0);
    }

    #[test]
    fn all_enabled_returns_total() {
        let total = series(Feed::Total, |i| (i * 10) as f64);
        let hvac = series(Feed::Hvac, |_| 400.0);
        let net = NetLoadService::new().calculate_net_load(
            &total,
            &[ComponentSeries { feed: Feed::Hvac, enabled: true, series: Some(&hvac) }],
        );
        assert_eq!(net, total);
    }

    #[test]
    fn missing_series_contributes_zero() {
        let total = series(Feed::Total, |_| 900.0);
        let net = NetLoadService::new().calculate_net_load(
            &total,
            &[ComponentSeries { feed: Feed::Car, enabled: false, series: None }],
        );
        assert!(net.watts_iter().all(|w| w == 900.0));
    }

    #[test]
    fn net_load_can_go_negative() {
        let total = series(Feed::Total, |_| 300.0);
        let solar = series(Feed::Solar, |_| 2000.0);
        let net = NetLoadService::new().calculate_net_load(
            &total,
            &[ComponentSeries { feed: Feed::Solar, enabled: false, series: Some(&solar) }],
        );
        assert_eq!(net.watts(0), -1700.0);
    }

    #[test]
    fn keeps_total_timestamps() {
        let total = series(Feed::Total, |_| 1.0);
        let net = NetLoadService::new().calculate_net_load(&total, &[]);
        assert_eq!(net.points()[47].start_time, total.points()[47].start_time);
        assert_eq!(net.feed(), Feed::Total);
    }
}

// ═══════════════════════════════════════════════════════════════════
// RampService
// ═══════════════════════════════════════════════════════════════════

mod ramp {
    use super::*;

    #[test]
    fn constant_disabled_water_heater_has_no_ramp() {
        let total = series(Feed::Total, |_| 100.0);
        let wh = series(Feed::WaterHeater, |_| 20.0);
        let net = NetLoadService::new().calculate_net_load(
            &total,
            &[ComponentSeries { feed: Feed::WaterHeater, enabled: false, series: Some(&wh) }],
        );
        assert!(RampWindow::Up.indices().all(|i| net.watts(i) == 80.0));

        let up = RampService::new().window_stats(&net, RampWindow::Up);
        assert_eq!(up.extreme, 0.0);
        assert_eq!(up.average, 0.0);
        assert_eq!(up.median, 0.0);
    }

    #[test]
    fn disabled_water_heater_leaves_single_step_into_window() {
        let total = series(Feed::Total, |_| 100.0);
        let wh = series(Feed::WaterHeater, |i| if (31..=40).contains(&i) { 20.0 } else { 0.0 });
        let net = NetLoadService::new().calculate_net_load(
            &total,
            &[ComponentSeries { feed: Feed::WaterHeater, enabled: false, series: Some(&wh) }],
        );
        for i in 31..=40 {
            assert_eq!(net.watts(i), 80.0);
        }

        let up = RampService::new().window_stats(&net, RampWindow::Up);
        // The only change is the step from slot 30 (100) into slot 31 (80).
        assert_eq!(up.steps[0], -20.0);
        assert!(up.steps[1..].iter().all(|&s| s == 0.0));
        assert_eq!(up.extreme, -20.0);
        assert_eq!(up.median, 0.0);
        assert_eq!(up.average, -2.0);
    }

    #[test]
    fn flat_window_has_zero_extreme_and_average() {
        let s = series(Feed::Total, |i| if i >= 30 { 80.0 } else { 100.0 });
        let up = RampService::new().window_stats(&s, RampWindow::Up);
        assert_eq!(up.extreme, 0.0);
        assert_eq!(up.average, 0.0);
        assert_eq!(up.median, 0.0);
        assert_eq!(up.peak_rate, 0.0);
        assert_eq!(up.peak_rate_percent, 0);
    }

    #[test]
    fn uniform_evening_climb() {
        // 10 at slot 30, then +20 per slot: 30, 50, ... 210.
        let s = series(Feed::Total, |i| if i >= 30 { 10.0 + 20.0 * (i - 30) as f64 } else { 10.0 });
        let up = RampService::new().window_stats(&s, RampWindow::Up);
        assert_eq!(up.steps, vec![20.0; 10]);
        assert_eq!(up.average, 20.0);
        assert_eq!(up.median, 20.0);
        assert_eq!(up.extreme, 20.0);
        assert_eq!(up.peak_rate, 20.0);
        // Steepest relative rise is the first one: 20 / 10.
        assert_eq!(up.peak_rate_percent, 200);
    }

    #[test]
    fn extreme_keeps_sign_of_steepest_drop() {
        let values = [1000.0, 990.0, 1010.0, 700.0, 720.0, 730.0, 740.0, 750.0, 760.0, 770.0, 780.0];
        let s = series(Feed::Total, |i| {
            if (12..=22).contains(&i) { values[i - 12] } else { 0.0 }
        });
        let down = RampService::new().window_stats(&s, RampWindow::Down);
        assert_eq!(down.steps[2], -310.0);
        assert_eq!(down.extreme, -310.0);
        assert_eq!(down.peak_rate, 310.0);
        // 310 / 1010 = 30.69 %
        assert_eq!(down.peak_rate_percent, 30);
    }

    #[test]
    fn extreme_ties_resolve_to_first_step() {
        // Steps: +50, -50, then flat.
        let s = series(Feed::Total, |i| match i {
            31 => 150.0,
            _ => 100.0,
        });
        let up = RampService::new().window_stats(&s, RampWindow::Up);
        assert_eq!(up.steps[0], 50.0);
        assert_eq!(up.steps[1], -50.0);
        assert_eq!(up.extreme, 50.0);

        let s = series(Feed::Total, |i| match i {
            31 => 50.0,
            _ => 100.0,
        });
        let up = RampService::new().window_stats(&s, RampWindow::Up);
        assert_eq!(up.extreme, -50.0);
    }

    #[test]
    fn median_of_even_window_averages_middle_pair() {
        // Steps 1..=10 in scrambled order; sorted middle pair is 5 and 6.
        let steps = [7.0, 2.0, 10.0, 5.0, 1.0, 9.0, 6.0, 3.0, 8.0, 4.0];
        let mut values = vec![0.0; 48];
        for (k, step) in steps.iter().enumerate() {
            values[31 + k] = values[30 + k] + step;
        }
        let s = series(Feed::Total, |i| values[i]);
        let up = RampService::new().window_stats(&s, RampWindow::Up);
        assert_eq!(up.median, 5.5);
        assert_eq!(up.average, 5.5);
        assert_eq!(up.extreme, 10.0);
    }

    #[test]
    fn zero_baseline_yields_zero_percent() {
        let s = series(Feed::Total, |i| if i >= 31 { 500.0 } else { 0.0 });
        let up = RampService::new().window_stats(&s, RampWindow::Up);
        assert_eq!(up.peak_rate, 500.0);
        assert_eq!(up.peak_rate_percent, 0);
    }

    #[test]
    fn negative_baseline_uses_magnitude() {
        // Solar-dominated afternoon: -200 at slot 30 rising to -100.
        let s = series(Feed::Total, |i| match i {
            30 => -200.0,
            31..=40 => -100.0,
            _ => 0.0,
        });
        let up = RampService::new().window_stats(&s, RampWindow::Up);
        assert_eq!(up.peak_rate, 100.0);
        assert_eq!(up.peak_rate_percent, 50);
    }

    #[test]
    fn analyze_covers_both_windows() {
        let s = series(Feed::Total, |i| i as f64 * 10.0);
        let summary = RampService::new().analyze(&s);
        assert_eq!(summary.up.window, RampWindow::Up);
        assert_eq!(summary.down.window, RampWindow::Down);
        assert_eq!(summary.up.steps.len(), 10);
        assert_eq!(summary.down.steps.len(), 10);
        assert_eq!(summary.down.peak_rate, 0.0);
        assert_eq!(summary.down.extreme, 10.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
// FetchService
// ═══════════════════════════════════════════════════════════════════

mod fetch {
    use super::*;

    fn request(mode: DisplayMode, date: NaiveDate, components: Vec<Feed>) -> FetchRequest {
        FetchRequest { mode, date, components }
    }

    #[tokio::test]
    async fn averaged_modes_query_first_of_month() {
        let provider = std::sync::Arc::new(MockFeedProvider::new());
        let service = FetchService::new(Box::new(SharedProvider(provider.clone())));
        let s = service
            .fetch_series(Feed::Total, DisplayMode::Weekdays, d(2020, 11, 17))
            .await
            .unwrap();
        assert_eq!(s.feed(), Feed::Total);
        assert_eq!(provider.calls(), vec!["average total weekdays 2020-11-01".to_string()]);
    }

    #[tokio::test]
    async fn single_mode_queries_the_day_and_solar_ignores_date() {
        let provider = std::sync::Arc::new(MockFeedProvider::new());
        let service = FetchService::new(Box::new(SharedProvider(provider.clone())));
        service
            .fetch_series(Feed::Car, DisplayMode::Single, d(2020, 11, 17))
            .await
            .unwrap();
        service
            .fetch_series(Feed::Solar, DisplayMode::Single, d(2020, 11, 17))
            .await
            .unwrap();
        assert_eq!(
            provider.calls(),
            vec!["day car 2020-11-17".to_string(), "solar".to_string()]
        );
    }

    #[tokio::test]
    async fn snapshot_fetches_total_and_components() {
        let service = FetchService::new(Box::new(MockFeedProvider::new()));
        let snapshot = service
            .fetch_snapshot(
                &request(DisplayMode::Single, d(2020, 12, 31), vec![Feed::WaterHeater, Feed::Solar]),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(snapshot.total.watts(0), 1000.0);
        assert_eq!(snapshot.components.len(), 2);
        assert_eq!(snapshot.component(Feed::WaterHeater).unwrap().watts(0), 200.0);
        assert_eq!(snapshot.component(Feed::Solar).unwrap().watts(20), 500.0);
        assert!(snapshot.component(Feed::Car).is_none());
    }

    #[tokio::test]
    async fn snapshot_routes_requests_by_mode() {
        let provider = std::sync::Arc::new(MockFeedProvider::new());
        let service = FetchService::new(Box::new(SharedProvider(provider.clone())));

        service
            .fetch_snapshot(
                &request(DisplayMode::Weekends, d(2020, 11, 1), vec![Feed::Car, Feed::Solar]),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        let mut calls = provider.calls();
        calls.sort();
        assert_eq!(
            calls,
            vec![
                "average car weekends 2020-11-01".to_string(),
                "average total weekends 2020-11-01".to_string(),
                "solar".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn duplicate_and_total_components_are_ignored() {
        let provider = std::sync::Arc::new(MockFeedProvider::new());
        let service = FetchService::new(Box::new(SharedProvider(provider.clone())));
        let snapshot = service
            .fetch_snapshot(
                &request(DisplayMode::Single, d(2020, 12, 5), vec![Feed::Car, Feed::Car, Feed::Total]),
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(snapshot.components.len(), 1);
        assert_eq!(provider.calls().len(), 2);
    }

    #[tokio::test]
    async fn one_failed_component_fails_snapshot() {
        // No HVAC profile → 404 from the mock.
        let service = FetchService::new(Box::new(MockFeedProvider::new()));
        let err = service
            .fetch_snapshot(
                &request(DisplayMode::Single, d(2020, 12, 5), vec![Feed::Hvac]),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Api { .. }));
    }

    #[tokio::test]
    async fn short_series_is_rejected() {
        let provider = MockFeedProvider::new().with_profile(Feed::Total, raw_points(47, |_| 1.0));
        let service = FetchService::new(Box::new(provider));
        let err = service
            .fetch_snapshot(
                &request(DisplayMode::All, d(2020, 12, 1), vec![]),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidSeries { feed: Feed::Total, actual: 47, .. }
        ));
    }

    #[tokio::test]
    async fn cancellation_ends_a_hanging_fetch() {
        let service = FetchService::new(Box::new(HangingProvider));
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let err = service
            .fetch_snapshot(&request(DisplayMode::All, d(2020, 12, 1), vec![Feed::Solar]), &token)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Cancelled));
    }

    #[tokio::test]
    async fn already_cancelled_token_short_circuits() {
        let service = FetchService::new(Box::new(MockFeedProvider::new()));
        let token = CancellationToken::new();
        token.cancel();
        let err = service
            .fetch_snapshot(&request(DisplayMode::All, d(2020, 12, 1), vec![]), &token)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Cancelled));
    }

    /// Lets a test keep a handle on the mock after boxing it.
    struct SharedProvider(std::sync::Arc<MockFeedProvider>);

    #[async_trait]
    impl FeedProvider for SharedProvider {
        fn name(&self) -> &str {
            self.0.name()
        }

        async fn get_average(
            &self,
            feed: Feed,
            mode: DisplayMode,
            month_start: NaiveDate,
        ) -> Result<Vec<Datapoint>, CoreError> {
            self.0.get_average(feed, mode, month_start).await
        }

        async fn get_day(&self, feed: Feed, date: NaiveDate) -> Result<Vec<Datapoint>, CoreError> {
            self.0.get_day(feed, date).await
        }

        async fn get_solar(&self) -> Result<Vec<Datapoint>, CoreError> {
            self.0.get_solar().await
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// ChartService
// ═══════════════════════════════════════════════════════════════════

mod chart {
    use super::*;

    fn view_state(mode: DisplayMode) -> ViewState {
        ViewState::new(
            mode,
            d(2020, 12, 31),
            d(2020, 12, 1),
            vec![ComponentToggle::new(Feed::Solar, false)],
        )
    }

    #[test]
    fn pixel_scale_depends_on_mode() {
        assert_eq!(watts_to_pixels(DisplayMode::Weekdays, 1200.0), 100.0);
        assert_eq!(watts_to_pixels(DisplayMode::Single, 1200.0), 30.0);
    }

    #[test]
    fn solar_polyline_covers_daylight_slots() {
        let solar = series(Feed::Solar, |i| if i == 14 { 1200.0 } else { 0.0 });
        let line = solar_polyline(&solar);
        let vertices: Vec<&str> = line.split(',').collect();
        assert_eq!(vertices.len(), 25);
        assert_eq!(vertices[0], "415 182");
        assert_eq!(vertices[24], "1015 282");
    }

    #[test]
    fn titles() {
        assert_eq!(
            chart_title(&view_state(DisplayMode::Weekdays)),
            "December 2020 · Weekday average"
        );
        assert_eq!(
            chart_title(&view_state(DisplayMode::Single)),
            "2020-12-31 · Single day"
        );
    }

    #[test]
    fn build_view_pairs_total_and_net() {
        let total = series(Feed::Total, |_| 1200.0);
        let solar = series(Feed::Solar, |_| 240.0);
        let net = NetLoadService::new().calculate_net_load(
            &total,
            &[ComponentSeries { feed: Feed::Solar, enabled: false, series: Some(&solar) }],
        );
        let ramps = RampService::new().analyze(&net);
        let view = ChartService::new().build_view(
            &view_state(DisplayMode::Weekdays),
            &total,
            &net,
            Some(&solar),
            ramps,
        );

        assert_eq!(view.points.len(), 48);
        assert_eq!(view.points[10].total_watts, 1200.0);
        assert_eq!(view.points[10].net_watts, 960.0);
        assert_eq!(view.points[10].y_px, 80.0);
        assert_eq!(view.mode_label, "Weekday average");
        assert_eq!(view.grid_lines, GRID_LINES);
        assert!(view.solar_line.is_some());
    }

    #[test]
    fn no_solar_line_without_solar() {
        let total = series(Feed::Total, |_| 1.0);
        let ramps = RampService::new().analyze(&total);
        let view = ChartService::new().build_view(
            &view_state(DisplayMode::Single),
            &total,
            &total,
            None,
            ramps,
        );
        assert!(view.solar_line.is_none());
    }
}
