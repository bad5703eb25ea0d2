//! Orbital Mechanics Library
//!
//! Propagation of beacon and relay trajectories over a fixed sample horizon:
//! - Closed-form circular orbits for operator-chosen beacon orbits
//! - SGP4 propagation of relay constellations from two-line elements
//! - Inertial to Earth-fixed rotation by Greenwich sidereal time
//!
//! Every propagated [`Trajectory`] has exactly one position per horizon
//! sample. Samples the model cannot resolve hold the zero sentinel
//! instead of being dropped, so trajectories of different bodies can be
//! zipped by sample index.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod circular;
pub mod propagation;
pub mod time;
pub mod tle;
pub mod trajectory;
pub mod transforms;

pub use circular::CircularOrbit;
pub use propagation::Sgp4Propagator;
pub use time::Horizon;
pub use tle::{parse_tle_text, TwoLineElements};
pub use trajectory::Trajectory;

#[derive(Error, Debug)]
pub enum OrbitalError {
    #[error("Invalid TLE format: {0}")]
    InvalidTle(String),
    #[error("Propagation failed: {0}")]
    PropagationFailed(String),
    #[error("Invalid local solar time {0:?}: expected HH:MM")]
    InvalidLocalSolarTime(String),
    #[error("Invalid orbit: {0}")]
    InvalidOrbit(String),
}

pub type Result<T> = std::result::Result<T, OrbitalError>;

pub mod constants {
    /// Mean Earth radius used by the circular model (km)
    pub const EARTH_RADIUS_KM: f64 = 6371.0;
    /// Earth gravitational parameter μ (km³/s²)
    pub const MU_EARTH_KM3_S2: f64 = 398600.4418;
    /// Inclination implied by the sun-synchronous orbit choice (deg)
    pub const SUN_SYNCHRONOUS_INCLINATION_DEG: f64 = 97.5;
    pub const SECONDS_PER_DAY: u32 = 86_400;
    pub const KM_TO_M: f64 = 1000.0;
}

/// Earth-fixed (ECEF) Cartesian position in meters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EcefPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl EcefPosition {
    /// Sentinel for samples the propagator could not resolve
    pub const ZERO: EcefPosition = EcefPosition { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Distance from the Earth's center in meters
    pub fn radius(&self) -> f64 {
        self.to_vector().norm()
    }

    pub fn is_sentinel(&self) -> bool {
        *self == Self::ZERO
    }
}

impl From<Vector3<f64>> for EcefPosition {
    fn from(v: Vector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}
