//! Simulation run
//!
//! One run is a batch: propagate both beacons and every relay over the
//! horizon, evaluate the cone test for every (beacon, relay) pair at every
//! sample, then fold the combined series into events and statistics.
//!
//! With the `parallel` feature, relays are propagated and evaluated on the
//! rayon pool. Each relay's trajectory and contact series is produced by a
//! single worker and collected in input order before detection starts.

use chrono::{DateTime, Utc};
use orbital_mechanics::{CircularOrbit, Horizon, Sgp4Propagator, Trajectory, TwoLineElements};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::SimulationConfig;
use crate::detector::{detect, LinkTimeline};
use crate::statistics::OutageStatistics;
use crate::visibility::{Visibility, VisibilityModel};
use crate::Result;

/// Relay dropped from the constellation because its elements failed to
/// initialize
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedRelay {
    pub index: usize,
    pub norad_id: Option<u32>,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayTrack {
    /// Position in the input element list
    pub index: usize,
    pub norad_id: Option<u32>,
    pub trajectory: Trajectory,
    /// Samples in which this relay was in view of either beacon
    pub contact_samples: usize,
}

/// Immutable result of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRun {
    pub epoch: DateTime<Utc>,
    pub horizon: Horizon,
    pub beacon_main: Trajectory,
    pub beacon_opposite: Trajectory,
    pub relays: Vec<RelayTrack>,
    pub excluded_relays: Vec<ExcludedRelay>,
    /// Any relay in view of either beacon, per sample
    pub visibility: Vec<bool>,
    pub timeline: LinkTimeline,
    pub statistics: OutageStatistics,
}

impl SimulationRun {
    pub fn handshake_count(&self) -> usize {
        self.timeline.handshake_count()
    }
}

pub struct Simulation {
    config: SimulationConfig,
    beacon: CircularOrbit,
    visibility: Visibility,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let beacon = config.beacon_orbit()?;
        let visibility = config.visibility_model();

        Ok(Self {
            config,
            beacon,
            visibility,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn beacon(&self) -> &CircularOrbit {
        &self.beacon
    }

    pub fn run(&self, epoch: DateTime<Utc>, relays: &[TwoLineElements]) -> SimulationRun {
        let horizon = self.config.horizon;
        let beacon_main = self.beacon.propagate(&horizon);
        let beacon_opposite = self.beacon.anti_phase().propagate(&horizon);

        let mut tracks = Vec::with_capacity(relays.len());
        let mut contacts = Vec::with_capacity(relays.len());
        let mut excluded_relays = Vec::new();

        for outcome in self.evaluate_relays(epoch, relays, &beacon_main, &beacon_opposite) {
            match outcome {
                Ok((track, contact)) => {
                    tracks.push(track);
                    contacts.push(contact);
                }
                Err(excluded) => excluded_relays.push(excluded),
            }
        }

        let visibility: Vec<bool> = (0..horizon.samples)
            .map(|i| contacts.iter().any(|c: &Vec<bool>| c[i]))
            .collect();

        let timeline = detect(&visibility, horizon.cadence_seconds);
        let statistics = OutageStatistics::from_durations(&timeline.outage_durations());

        debug!(
            "Run complete: {} relays ({} excluded), {} handshakes, {} outages, {} s in view",
            tracks.len(),
            excluded_relays.len(),
            timeline.handshake_count(),
            statistics.outage_count,
            timeline.in_view_seconds()
        );

        SimulationRun {
            epoch,
            horizon,
            beacon_main,
            beacon_opposite,
            relays: tracks,
            excluded_relays,
            visibility,
            timeline,
            statistics,
        }
    }

    fn evaluate_relays(
        &self,
        epoch: DateTime<Utc>,
        relays: &[TwoLineElements],
        beacon_main: &Trajectory,
        beacon_opposite: &Trajectory,
    ) -> Vec<std::result::Result<(RelayTrack, Vec<bool>), ExcludedRelay>> {
        #[cfg(feature = "parallel")]
        let iter = relays.par_iter().enumerate();
        #[cfg(not(feature = "parallel"))]
        let iter = relays.iter().enumerate();

        iter.map(|(index, tle)| {
            self.evaluate_relay(index, tle, epoch, beacon_main, beacon_opposite)
        })
        .collect()
    }

    fn evaluate_relay(
        &self,
        index: usize,
        tle: &TwoLineElements,
        epoch: DateTime<Utc>,
        beacon_main: &Trajectory,
        beacon_opposite: &Trajectory,
    ) -> std::result::Result<(RelayTrack, Vec<bool>), ExcludedRelay> {
        let norad_id = tle.norad_id();
        let propagator = Sgp4Propagator::new(tle).map_err(|e| {
            warn!("Excluding relay #{} ({:?}): {}", index, norad_id, e);
            ExcludedRelay {
                index,
                norad_id,
                reason: e.to_string(),
            }
        })?;

        let horizon = self.config.horizon;
        let trajectory = propagator.propagate(epoch, &horizon);
        if trajectory.gap_count() > 0 {
            warn!(
                "Relay #{} ({:?}) has {} unresolved samples",
                index,
                norad_id,
                trajectory.gap_count()
            );
        }

        let contact: Vec<bool> = (0..horizon.samples)
            .map(|i| {
                let relay = trajectory.at(i);
                self.visibility.in_view(&beacon_main.at(i), &relay)
                    || self.visibility.in_view(&beacon_opposite.at(i), &relay)
            })
            .collect();
        let contact_samples = contact.iter().filter(|&&c| c).count();

        Ok((
            RelayTrack {
                index,
                norad_id,
                trajectory,
                contact_samples,
            },
            contact,
        ))
    }
}
