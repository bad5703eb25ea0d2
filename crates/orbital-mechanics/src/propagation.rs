//! SGP4 relay propagation
//!
//! Wraps the `sgp4` crate: elements are parsed and initialized once per
//! relay, then each horizon sample is propagated in TEME, rotated into the
//! Earth-fixed frame by GMST and scaled to meters.

use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use tracing::debug;

use crate::constants::KM_TO_M;
use crate::time::{gmst, Horizon};
use crate::transforms::eci_to_ecef;
use crate::{EcefPosition, OrbitalError, Result, Trajectory, TwoLineElements};

pub struct Sgp4Propagator {
    constants: sgp4::Constants,
    epoch: DateTime<Utc>,
}

impl Sgp4Propagator {
    /// Initialize the model from an element pair. Fails on malformed elements.
    pub fn new(tle: &TwoLineElements) -> Result<Self> {
        let elements = sgp4::Elements::from_tle(
            None,
            tle.line1.as_bytes(),
            tle.line2.as_bytes(),
        )
        .map_err(|e| OrbitalError::InvalidTle(format!("{:?}", e)))?;

        let constants = sgp4::Constants::from_elements(&elements)
            .map_err(|e| OrbitalError::PropagationFailed(format!("{:?}", e)))?;

        let epoch = DateTime::<Utc>::from_naive_utc_and_offset(elements.datetime, Utc);

        Ok(Self { constants, epoch })
    }

    /// Element set epoch
    pub fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }

    pub fn minutes_since_epoch(&self, time: DateTime<Utc>) -> f64 {
        let duration = time.signed_duration_since(self.epoch);
        duration.num_milliseconds() as f64 / 60_000.0
    }

    /// TEME position in km
    pub fn inertial_position_km(&self, time: DateTime<Utc>) -> Result<Vector3<f64>> {
        let prediction = self
            .constants
            .propagate(self.minutes_since_epoch(time))
            .map_err(|e| OrbitalError::PropagationFailed(format!("{:?}", e)))?;

        let p = prediction.position;
        let position = Vector3::new(p[0], p[1], p[2]);
        if !position.iter().all(|c| c.is_finite()) || position.norm() == 0.0 {
            return Err(OrbitalError::PropagationFailed(
                "degenerate position".to_string(),
            ));
        }

        Ok(position)
    }

    /// Earth-fixed position in meters
    pub fn position_at(&self, time: DateTime<Utc>) -> Result<EcefPosition> {
        let eci = self.inertial_position_km(time)?;
        Ok(EcefPosition::from(eci_to_ecef(eci, gmst(time)) * KM_TO_M))
    }

    /// Propagate over the horizon starting at `start`.
    ///
    /// Samples the model cannot resolve become the zero sentinel.
    pub fn propagate(&self, start: DateTime<Utc>, horizon: &Horizon) -> Trajectory {
        let trajectory = Trajectory::from_samples(horizon, |i| {
            self.position_at(horizon.sample_time(start, i)).ok()
        });

        if trajectory.gap_count() > 0 {
            debug!(
                "SGP4 left {} of {} samples unresolved",
                trajectory.gap_count(),
                horizon.samples
            );
        }

        trajectory
    }
}
