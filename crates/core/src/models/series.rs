use serde::Serialize;

use super::datapoint::Datapoint;
use super::feed::Feed;
use crate::errors::CoreError;

/// Number of half-hour slots in one day.
pub const POINTS_PER_DAY: usize = 48;

/// One day of a feed at half-hour resolution.
///
/// Always exactly [`POINTS_PER_DAY`] points; index 0 is the slot starting at
/// midnight. The only way to build one is [`DaySeries::new`], so every index
/// in `0..48` is valid on any value of this type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySeries {
    feed: Feed,
    points: Vec<Datapoint>,
}

impl DaySeries {
    /// Validate a raw API response into a day series.
    pub fn new(feed: Feed, points: Vec<Datapoint>) -> Result<Self, CoreError> {
        if points.len() != POINTS_PER_DAY {
            return Err(CoreError::InvalidSeries {
                feed,
                expected: POINTS_PER_DAY,
                actual: points.len(),
            });
        }
        Ok(Self { feed, points })
    }

    pub fn feed(&self) -> Feed {
        self.feed
    }

    pub fn points(&self) -> &[Datapoint] {
        &self.points
    }

    /// Power at slot `index`. Panics only on `index >= 48`.
    pub fn watts(&self, index: usize) -> f64 {
        self.points[index].average_power_watts
    }

    pub fn watts_iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.average_power_watts)
    }

    /// Same feed and timestamps, power recomputed per slot from `(index, watts)`.
    pub fn map_watts(&self, mut f: impl FnMut(usize, f64) -> f64) -> DaySeries {
        let points = self
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| Datapoint::new(p.start_time, f(i, p.average_power_watts)))
            .collect();
        DaySeries {
            feed: self.feed,
            points,
        }
    }
}
