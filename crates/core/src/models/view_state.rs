use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::display_mode::DisplayMode;
use super::feed::{ComponentToggle, Feed};

/// Everything the explorer needs to know to decide what to fetch and show.
///
/// Immutable: navigation produces a new value through [`ViewState::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub display_mode: DisplayMode,

    /// Day shown in `Single` mode
    pub current_date: NaiveDate,

    /// Month averaged in the other modes; always the first of the month
    pub current_month: NaiveDate,

    /// Requested components in legend order
    pub components: Vec<ComponentToggle>,
}

/// A single user action on the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTransition {
    ChangeDisplayMode(DisplayMode),
    PreviousMonth,
    NextMonth,
    PreviousDay,
    NextDay,
    SetComponentEnabled(Feed, bool),
    JumpToDate(NaiveDate),
}

/// What one navigation has to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub mode: DisplayMode,

    /// First of the month for averaged modes, the shown day for `Single`
    pub date: NaiveDate,

    /// Component feeds to fetch alongside the total
    pub components: Vec<Feed>,
}

impl ViewState {
    pub fn new(
        display_mode: DisplayMode,
        current_date: NaiveDate,
        current_month: NaiveDate,
        components: Vec<ComponentToggle>,
    ) -> Self {
        Self {
            display_mode,
            current_date,
            current_month: first_of_month(current_month),
            components,
        }
    }

    /// Produce the state that results from `transition`.
    pub fn apply(&self, transition: ViewTransition) -> ViewState {
        let mut next = self.clone();
        match transition {
            ViewTransition::ChangeDisplayMode(mode) => next.display_mode = mode,
            ViewTransition::PreviousMonth => next.current_month = previous_month(self.current_month),
            ViewTransition::NextMonth => next.current_month = next_month(self.current_month),
            ViewTransition::PreviousDay => {
                next.current_date = self.current_date.pred_opt().unwrap_or(self.current_date);
            }
            ViewTransition::NextDay => {
                next.current_date = self.current_date.succ_opt().unwrap_or(self.current_date);
            }
            ViewTransition::SetComponentEnabled(feed, enabled) => {
                if feed.is_component() {
                    match next.components.iter_mut().find(|c| c.feed == feed) {
                        Some(toggle) => toggle.enabled = enabled,
                        None => next.components.push(ComponentToggle::new(feed, enabled)),
                    }
                }
            }
            ViewTransition::JumpToDate(date) => {
                next.current_date = date;
                next.current_month = first_of_month(date);
            }
        }
        next
    }

    /// The date the API is queried with for the current mode.
    pub fn query_date(&self) -> NaiveDate {
        if self.display_mode.is_average() {
            self.current_month
        } else {
            self.current_date
        }
    }

    pub fn fetch_request(&self) -> FetchRequest {
        FetchRequest {
            mode: self.display_mode,
            date: self.query_date(),
            components: self.components.iter().map(|c| c.feed).collect(),
        }
    }

    /// `Some(enabled)` for a requested component, `None` otherwise.
    pub fn component_enabled(&self, feed: Feed) -> Option<bool> {
        self.components
            .iter()
            .find(|c| c.feed == feed)
            .map(|c| c.enabled)
    }
}

/// The date range the backing data covers, used to grey out navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationBounds {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl NavigationBounds {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    pub fn can_go_previous_day(&self, state: &ViewState) -> bool {
        state
            .current_date
            .pred_opt()
            .is_some_and(|d| d >= self.start_date)
    }

    pub fn can_go_next_day(&self, state: &ViewState) -> bool {
        state
            .current_date
            .succ_opt()
            .is_some_and(|d| d <= self.end_date)
    }

    pub fn can_go_previous_month(&self, state: &ViewState) -> bool {
        previous_month(state.current_month) >= first_of_month(self.start_date)
    }

    pub fn can_go_next_month(&self, state: &ViewState) -> bool {
        next_month(state.current_month) <= self.end_date
    }
}

/// First day of `date`'s month.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month before `month`, wrapping January to December of the prior year.
pub fn previous_month(month: NaiveDate) -> NaiveDate {
    let (year, m) = if month.month() == 1 {
        (month.year() - 1, 12)
    } else {
        (month.year(), month.month() - 1)
    };
    NaiveDate::from_ymd_opt(year, m, 1).unwrap_or(month)
}

/// First day of the month after `month`, wrapping December to January of the next year.
pub fn next_month(month: NaiveDate) -> NaiveDate {
    let (year, m) = if month.month() == 12 {
        (month.year() + 1, 1)
    } else {
        (month.year(), month.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, m, 1).unwrap_or(month)
}
