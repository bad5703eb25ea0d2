//! Link Availability Library
//!
//! Line-of-sight availability between a pair of anti-phase beacons and a
//! relay constellation over a 24-hour, one-sample-per-minute horizon.
//!
//! # Pipeline
//!
//! ```text
//! CircularOrbit ──► beacon trajectories ─┐
//!                                        ├─► cone test per (beacon, relay, sample)
//! TLEs ──► SGP4 ──► relay trajectories ──┘            │
//!                                                     ▼
//!                         combined series ──► detector ──► statistics
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let sim = Simulation::new(SimulationConfig::default())?;
//! let run = sim.run(Utc::now(), &parse_tle_text(&text));
//! println!("{} handshakes", run.handshake_count());
//! ```

use orbital_mechanics::OrbitalError;
use thiserror::Error;

pub mod config;
pub mod detector;
pub mod simulation;
pub mod statistics;
pub mod visibility;

pub use config::{OrbitSelection, SimulationConfig, VisibilityFormulation};
pub use detector::{detect, HandshakeEvent, LinkState, LinkTimeline, OutageEvent};
pub use simulation::{ExcludedRelay, RelayTrack, Simulation, SimulationRun};
pub use statistics::OutageStatistics;
pub use visibility::{ConeVisibility, Visibility, VisibilityModel, ZenithConeVisibility};

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Orbital(#[from] OrbitalError),
}

pub type Result<T> = std::result::Result<T, LinkError>;
