use tracing::debug;

use crate::models::feed::Feed;
use crate::models::series::DaySeries;

/// One component as the calculator sees it.
#[derive(Debug, Clone, Copy)]
pub struct ComponentSeries<'a> {
    pub feed: Feed,

    /// Enabled components stay in the total; disabled ones are subtracted
    pub enabled: bool,

    /// `None` while the series has not been fetched; counts as zero
    pub series: Option<&'a DaySeries>,
}

/// Derives the net-load curve from a total and its sub-loads.
pub struct NetLoadService;

impl NetLoadService {
    pub fn new() -> Self {
        Self
    }

    /// `net[i] = total[i] - Σ disabled component[i]`.
    ///
    /// A disabled component without a series contributes zero, so the result
    /// is only as complete as the series passed in. Timestamps come from the
    /// total.
    pub fn calculate_net_load(&self, total: &DaySeries, components: &[ComponentSeries<'_>]) -> DaySeries {
        let subtracted: Vec<&DaySeries> = components
            .iter()
            .filter(|c| !c.enabled)
            .filter_map(|c| {
                if c.series.is_none() {
                    debug!(feed = %c.feed, "component series missing; treating as zero");
                }
                c.series
            })
            .collect();

        total.map_watts(|i, watts| watts - subtracted.iter().map(|s| s.watts(i)).sum::<f64>())
    }
}

impl Default for NetLoadService {
    fn default() -> Self {
        Self::new()
    }
}
