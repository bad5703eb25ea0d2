//! Outage statistics and duration histogram

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutageStatistics {
    pub outage_count: usize,
    pub total_outage_seconds: u64,
    /// `None` when there were no outages
    pub mean_outage_seconds: Option<f64>,
    /// Duration (s) → number of outages with that duration
    pub histogram: BTreeMap<u64, usize>,
}

impl OutageStatistics {
    pub fn from_durations(durations: &[u64]) -> Self {
        let outage_count = durations.len();
        let total_outage_seconds: u64 = durations.iter().sum();
        let mean_outage_seconds =
            (outage_count > 0).then(|| total_outage_seconds as f64 / outage_count as f64);

        let mut histogram = BTreeMap::new();
        for &d in durations {
            *histogram.entry(d).or_insert(0) += 1;
        }

        Self {
            outage_count,
            total_outage_seconds,
            mean_outage_seconds,
            histogram,
        }
    }

    pub fn longest_outage_seconds(&self) -> Option<u64> {
        self.histogram.keys().next_back().copied()
    }
}
