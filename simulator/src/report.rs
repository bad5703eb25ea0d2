//! JSON run report

use anyhow::Result;
use chrono::{DateTime, Utc};
use link_availability::{ExcludedRelay, SimulationConfig, SimulationRun};
use orbital_mechanics::Trajectory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub handshake_count: usize,
    pub outage_count: usize,
    pub total_outage_seconds: u64,
    /// `null` when there were no outages
    pub mean_outage_seconds: Option<f64>,
    pub in_view_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelaySummary {
    pub index: usize,
    pub norad_id: Option<u32>,
    pub contact_samples: usize,
    pub unresolved_samples: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Positions {
    pub beacon_main: Trajectory,
    pub beacon_opposite: Trajectory,
    pub relays: Vec<Trajectory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub config: SimulationConfig,
    pub epoch: DateTime<Utc>,
    pub summary: RunSummary,
    pub outage_durations: Vec<u64>,
    /// Outage duration (s) → occurrences
    pub outage_histogram: BTreeMap<u64, usize>,
    /// Per-sample handshake edges (0/1)
    pub handshake_series: Vec<u8>,
    pub relays: Vec<RelaySummary>,
    pub excluded_relays: Vec<ExcludedRelay>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub positions: Option<Positions>,
}

impl SimulationReport {
    pub fn new(config: &SimulationConfig, run: &SimulationRun, include_positions: bool) -> Self {
        let stats = &run.statistics;

        let positions = include_positions.then(|| Positions {
            beacon_main: run.beacon_main.clone(),
            beacon_opposite: run.beacon_opposite.clone(),
            relays: run.relays.iter().map(|r| r.trajectory.clone()).collect(),
        });

        Self {
            config: config.clone(),
            epoch: run.epoch,
            summary: RunSummary {
                handshake_count: run.handshake_count(),
                outage_count: stats.outage_count,
                total_outage_seconds: stats.total_outage_seconds,
                mean_outage_seconds: stats.mean_outage_seconds,
                in_view_seconds: run.timeline.in_view_seconds(),
            },
            outage_durations: run.timeline.outage_durations(),
            outage_histogram: stats.histogram.clone(),
            handshake_series: run.timeline.handshake_series.clone(),
            relays: run
                .relays
                .iter()
                .map(|r| RelaySummary {
                    index: r.index,
                    norad_id: r.norad_id,
                    contact_samples: r.contact_samples,
                    unresolved_samples: r.trajectory.gap_count(),
                })
                .collect(),
            excluded_relays: run.excluded_relays.clone(),
            positions,
        }
    }

    /// Pretty JSON to `path`, or stdout when `None`
    pub fn write(&self, path: Option<&Path>) -> Result<()> {
        match path {
            Some(path) => {
                let mut writer = BufWriter::new(File::create(path)?);
                serde_json::to_writer_pretty(&mut writer, self)?;
                writer.flush()?;
            }
            None => {
                let stdout = std::io::stdout();
                let mut lock = stdout.lock();
                serde_json::to_writer_pretty(&mut lock, self)?;
                writeln!(lock)?;
            }
        }
        Ok(())
    }
}
