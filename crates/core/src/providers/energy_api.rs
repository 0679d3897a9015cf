use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::traits::FeedProvider;
use crate::errors::CoreError;
use crate::models::datapoint::Datapoint;
use crate::models::display_mode::DisplayMode;
use crate::models::feed::Feed;

const PROVIDER_NAME: &str = "EnergyApi";

/// Client for the duck-curve energy API.
///
/// - **Endpoints**: `/{feed}/average/{mode}/{date}`, `/{feed}/day/{date}`, `/solar`
/// - **Payload**: JSON array of `{ "startTime", "averagePowerWatts" }`
/// - **Errors**: non-2xx responses surface as `CoreError::Api` with the status;
///   nothing is retried.
pub struct EnergyApiProvider {
    client: Client,
    base_url: String,
}

impl EnergyApiProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_points(&self, url: &str) -> Result<Vec<Datapoint>, CoreError> {
        debug!(url, "requesting feed data");
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("Server returned code {} for {url}", status.as_u16()),
            });
        }

        resp.json::<Vec<Datapoint>>().await.map_err(|e| CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Failed to parse datapoints from {url}: {e}"),
        })
    }
}

/// Zero-padded `YYYY-MM-DD` from the date's calendar components.
pub fn format_api_date(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

pub fn average_url(base_url: &str, feed: Feed, mode: DisplayMode, month_start: NaiveDate) -> String {
    format!(
        "{base_url}/{}/average/{}/{}",
        feed.path_segment(),
        mode.path_segment(),
        format_api_date(month_start)
    )
}

pub fn day_url(base_url: &str, feed: Feed, date: NaiveDate) -> String {
    format!("{base_url}/{}/day/{}", feed.path_segment(), format_api_date(date))
}

pub fn solar_url(base_url: &str) -> String {
    format!("{base_url}/solar")
}

#[async_trait]
impl FeedProvider for EnergyApiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn get_average(
        &self,
        feed: Feed,
        mode: DisplayMode,
        month_start: NaiveDate,
    ) -> Result<Vec<Datapoint>, CoreError> {
        if !mode.is_average() {
            return Err(CoreError::ValidationError(format!(
                "'{mode}' is not an averaging mode"
            )));
        }
        let url = average_url(&self.base_url, feed, mode, month_start);
        self.get_points(&url).await
    }

    async fn get_day(&self, feed: Feed, date: NaiveDate) -> Result<Vec<Datapoint>, CoreError> {
        let url = day_url(&self.base_url, feed, date);
        self.get_points(&url).await
    }

    async fn get_solar(&self) -> Result<Vec<Datapoint>, CoreError> {
        let url = solar_url(&self.base_url);
        self.get_points(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://api.test/api";

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn dates_are_zero_padded() {
        assert_eq!(format_api_date(d(2020, 3, 7)), "2020-03-07");
        assert_eq!(format_api_date(d(987, 12, 31)), "0987-12-31");
    }

    #[test]
    fn average_url_uses_feed_mode_and_month() {
        assert_eq!(
            average_url(BASE, Feed::WaterHeater, DisplayMode::Weekends, d(2020, 11, 1)),
            "http://api.test/api/wh/average/weekends/2020-11-01"
        );
    }

    #[test]
    fn day_and_solar_urls() {
        assert_eq!(
            day_url(BASE, Feed::Total, d(2020, 12, 31)),
            "http://api.test/api/total/day/2020-12-31"
        );
        assert_eq!(solar_url(BASE), "http://api.test/api/solar");
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base() {
        let provider = EnergyApiProvider::new("http://api.test/api//", Duration::from_secs(1));
        assert_eq!(provider.base_url(), "http://api.test/api");
    }
}
