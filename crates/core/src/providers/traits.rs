use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::datapoint::Datapoint;
use crate::models::display_mode::DisplayMode;
use crate::models::feed::Feed;

/// Source of half-hourly feed data.
///
/// The HTTP API is one implementation; tests and offline tools plug in
/// others. Implementations return raw points; length validation happens
/// in `FetchService`.
#[async_trait]
pub trait FeedProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Averaged daily profile of `feed` over the days of `month_start`'s
    /// month selected by `mode`.
    async fn get_average(
        &self,
        feed: Feed,
        mode: DisplayMode,
        month_start: NaiveDate,
    ) -> Result<Vec<Datapoint>, CoreError>;

    /// Actual readings of `feed` on `date`.
    async fn get_day(&self, feed: Feed, date: NaiveDate) -> Result<Vec<Datapoint>, CoreError>;

    /// Reference solar production profile (not scoped to a date).
    async fn get_solar(&self) -> Result<Vec<Datapoint>, CoreError>;
}
