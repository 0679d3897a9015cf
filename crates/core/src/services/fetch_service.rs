use chrono::NaiveDate;
use futures::future::try_join_all;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::display_mode::DisplayMode;
use crate::models::feed::Feed;
use crate::models::series::DaySeries;
use crate::models::view_state::{first_of_month, FetchRequest};
use crate::providers::traits::FeedProvider;

/// Every series one navigation needs, fetched together.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedSnapshot {
    pub request: FetchRequest,
    pub total: DaySeries,
    /// Fetched component series, in request order
    pub components: Vec<DaySeries>,
}

impl FeedSnapshot {
    pub fn component(&self, feed: Feed) -> Option<&DaySeries> {
        self.components.iter().find(|s| s.feed() == feed)
    }
}

/// Fetches feed series through a provider and validates them into [`DaySeries`].
///
/// `fetch_snapshot` is a join barrier: the total and every requested
/// component are requested concurrently and the snapshot is only returned
/// once all of them have arrived. A single failure fails the snapshot, so
/// callers never see a partially updated set of series.
pub struct FetchService {
    provider: Box<dyn FeedProvider>,
}

impl FetchService {
    pub fn new(provider: Box<dyn FeedProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Fetch one feed for the given mode.
    ///
    /// Solar always comes from the unscoped solar profile; other feeds use the
    /// month average (queried with the first of `date`'s month) or the single
    /// day, depending on `mode`.
    pub async fn fetch_series(
        &self,
        feed: Feed,
        mode: DisplayMode,
        date: NaiveDate,
    ) -> Result<DaySeries, CoreError> {
        let points = match feed {
            Feed::Solar => self.provider.get_solar().await?,
            _ if mode.is_average() => {
                self.provider
                    .get_average(feed, mode, first_of_month(date))
                    .await?
            }
            _ => self.provider.get_day(feed, date).await?,
        };
        DaySeries::new(feed, points)
    }

    /// Fetch the total plus every requested component, or nothing.
    ///
    /// Returns `CoreError::Cancelled` as soon as `cancel` fires; in-flight
    /// requests are dropped.
    pub async fn fetch_snapshot(
        &self,
        request: &FetchRequest,
        cancel: &CancellationToken,
    ) -> Result<FeedSnapshot, CoreError> {
        let mut feeds = vec![Feed::Total];
        for feed in &request.components {
            if feed.is_component() && !feeds.contains(feed) {
                feeds.push(*feed);
            }
        }

        debug!(
            provider = self.provider.name(),
            mode = %request.mode,
            date = %request.date,
            feeds = feeds.len(),
            "fetching snapshot"
        );

        let fetches = feeds
            .iter()
            .map(|&feed| self.fetch_series(feed, request.mode, request.date));

        let series = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(date = %request.date, "snapshot fetch cancelled");
                return Err(CoreError::Cancelled);
            }
            res = try_join_all(fetches) => res?,
        };

        let mut series = series.into_iter();
        let total = series.next().ok_or_else(|| {
            CoreError::ValidationError("snapshot fetch returned no total series".into())
        })?;

        Ok(FeedSnapshot {
            request: request.clone(),
            total,
            components: series.collect(),
        })
    }
}
