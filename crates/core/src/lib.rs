pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use models::{
    chart::ChartView,
    display_mode::DisplayMode,
    feed::Feed,
    settings::Settings,
    view_state::{FetchRequest, NavigationBounds, ViewState, ViewTransition},
};
use providers::{energy_api::EnergyApiProvider, traits::FeedProvider};
use services::{
    chart_service::ChartService,
    fetch_service::{FeedSnapshot, FetchService},
    net_load_service::{ComponentSeries, NetLoadService},
    ramp_service::RampService,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use errors::CoreError;

/// Proof that a navigation was started, and the state it was started for.
///
/// Results are only applied if the ticket is still the newest one when it
/// comes back; starting another navigation cancels this ticket's token.
#[derive(Debug, Clone)]
pub struct NavigationTicket {
    generation: u64,
    state: ViewState,
    token: CancellationToken,
}

impl NavigationTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn request(&self) -> FetchRequest {
        self.state.fetch_request()
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Run this ticket's fetch. Does not touch the explorer, so it can run
    /// on another task while newer navigations start.
    pub async fn fetch_with(&self, fetcher: &FetchService) -> Result<FeedSnapshot, CoreError> {
        fetcher.fetch_snapshot(&self.request(), &self.token).await
    }
}

/// What happened to a completed navigation.
#[derive(Debug)]
pub enum NavigationOutcome {
    /// Fresh data replaced the previous snapshot and view
    Applied,
    /// A newer navigation started meanwhile; the result was dropped
    Stale,
    /// The fetch failed; the previous snapshot and view are untouched
    Failed(CoreError),
}

impl NavigationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, NavigationOutcome::Applied)
    }
}

/// Main entry point for the duck-curve core library.
///
/// Owns the current view state and the latest fetched data, and drives the
/// fetch → net load → ramp rates → chart pipeline on every navigation.
#[must_use]
pub struct DuckCurveExplorer {
    settings: Settings,
    state: ViewState,
    fetcher: Arc<FetchService>,
    net_load_service: NetLoadService,
    ramp_service: RampService,
    chart_service: ChartService,
    snapshot: Option<FeedSnapshot>,
    view: Option<ChartView>,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

impl std::fmt::Debug for DuckCurveExplorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckCurveExplorer")
            .field("provider", &self.fetcher.provider_name())
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("has_view", &self.view.is_some())
            .finish()
    }
}

impl DuckCurveExplorer {
    /// Explorer backed by the HTTP energy API configured in `settings`.
    pub fn new(settings: Settings) -> Result<Self, CoreError> {
        let provider = EnergyApiProvider::new(
            settings.base_url(),
            Duration::from_secs(settings.request_timeout_secs),
        );
        Self::with_provider(settings, Box::new(provider))
    }

    /// Explorer backed by any provider (mocks, fixtures, alternative APIs).
    pub fn with_provider(
        settings: Settings,
        provider: Box<dyn FeedProvider>,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        let state = settings.initial_view_state();
        Ok(Self {
            settings,
            state,
            fetcher: Arc::new(FetchService::new(provider)),
            net_load_service: NetLoadService::new(),
            ramp_service: RampService::new(),
            chart_service: ChartService::new(),
            snapshot: None,
            view: None,
            generation: 0,
            in_flight: None,
        })
    }

    // ── State ───────────────────────────────────────────────────────

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Chart for the last applied navigation, if any.
    #[must_use]
    pub fn view(&self) -> Option<&ChartView> {
        self.view.as_ref()
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&FeedSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn bounds(&self) -> &NavigationBounds {
        &self.settings.bounds
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Number of navigations started so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Shared handle to the fetcher, for running ticket fetches off the explorer.
    pub fn fetcher(&self) -> Arc<FetchService> {
        Arc::clone(&self.fetcher)
    }

    // ── Navigation ──────────────────────────────────────────────────

    /// Apply `transition` and issue a ticket for the fetch it requires.
    /// Cancels whatever navigation was still in flight.
    pub fn begin_navigation(&mut self, transition: ViewTransition) -> NavigationTicket {
        self.state = self.state.apply(transition);
        debug!(?transition, "view transition applied");
        self.issue_ticket()
    }

    /// Issue a ticket that refetches the current state.
    pub fn begin_refresh(&mut self) -> NavigationTicket {
        self.issue_ticket()
    }

    /// Apply a finished fetch if its ticket is still current.
    ///
    /// Fetch errors are logged and swallowed here: the previous data and
    /// chart stay as they were and nothing is retried.
    pub fn complete_navigation(
        &mut self,
        ticket: NavigationTicket,
        result: Result<FeedSnapshot, CoreError>,
    ) -> NavigationOutcome {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding result of superseded navigation"
            );
            return NavigationOutcome::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(snapshot) => {
                let view = self.compute_view(&ticket.state, &snapshot);
                info!(
                    mode = %ticket.state.display_mode,
                    date = %snapshot.request.date,
                    ramp_up = view.ramps.up.extreme,
                    ramp_down = view.ramps.down.extreme,
                    "chart updated"
                );
                self.snapshot = Some(snapshot);
                self.view = Some(view);
                NavigationOutcome::Applied
            }
            Err(e) => {
                warn!(
                    mode = %ticket.state.display_mode,
                    date = %ticket.state.query_date(),
                    error = %e,
                    "fetch failed; keeping previous chart"
                );
                NavigationOutcome::Failed(e)
            }
        }
    }

    /// Apply `transition`, fetch, and recompute in one go.
    pub async fn navigate(&mut self, transition: ViewTransition) -> NavigationOutcome {
        let ticket = self.begin_navigation(transition);
        self.run(ticket).await
    }

    /// Refetch and recompute the current state.
    pub async fn refresh(&mut self) -> NavigationOutcome {
        let ticket = self.begin_refresh();
        self.run(ticket).await
    }

    pub async fn on_change_display_mode(&mut self, mode: DisplayMode) -> NavigationOutcome {
        self.navigate(ViewTransition::ChangeDisplayMode(mode)).await
    }

    pub async fn previous_month(&mut self) -> NavigationOutcome {
        self.navigate(ViewTransition::PreviousMonth).await
    }

    pub async fn next_month(&mut self) -> NavigationOutcome {
        self.navigate(ViewTransition::NextMonth).await
    }

    pub async fn previous_day(&mut self) -> NavigationOutcome {
        self.navigate(ViewTransition::PreviousDay).await
    }

    pub async fn next_day(&mut self) -> NavigationOutcome {
        self.navigate(ViewTransition::NextDay).await
    }

    pub async fn set_component_enabled(&mut self, feed: Feed, enabled: bool) -> NavigationOutcome {
        self.navigate(ViewTransition::SetComponentEnabled(feed, enabled))
            .await
    }

    // ── Internal ────────────────────────────────────────────────────

    fn issue_ticket(&mut self) -> NavigationTicket {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }
        self.generation += 1;
        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());
        NavigationTicket {
            generation: self.generation,
            state: self.state.clone(),
            token,
        }
    }

    async fn run(&mut self, ticket: NavigationTicket) -> NavigationOutcome {
        let fetcher = self.fetcher();
        let result = ticket.fetch_with(&fetcher).await;
        self.complete_navigation(ticket, result)
    }

    fn compute_view(&self, state: &ViewState, snapshot: &FeedSnapshot) -> ChartView {
        let components: Vec<ComponentSeries<'_>> = state
            .components
            .iter()
            .map(|toggle| ComponentSeries {
                feed: toggle.feed,
                enabled: toggle.enabled,
                series: snapshot.component(toggle.feed),
            })
            .collect();

        let net = self
            .net_load_service
            .calculate_net_load(&snapshot.total, &components);
        let ramps = self.ramp_service.analyze(&net);

        self.chart_service.build_view(
            state,
            &snapshot.total,
            &net,
            snapshot.component(Feed::Solar),
            ramps,
        )
    }
}
