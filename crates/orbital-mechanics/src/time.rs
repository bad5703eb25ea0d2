//! Sample horizon, local solar time and sidereal time helpers

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use crate::constants::SECONDS_PER_DAY;
use crate::{OrbitalError, Result};

/// Julian date of the Unix epoch (1970-01-01T00:00:00Z)
const JD_UNIX_EPOCH: f64 = 2440587.5;
/// Julian date of J2000.0
const JD_J2000: f64 = 2451545.0;

/// Fixed-cadence sampling of the simulated interval.
///
/// Sample `i` sits at `i * cadence_seconds` after the run epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    pub samples: usize,
    pub cadence_seconds: u32,
}

impl Horizon {
    /// 24 hours at one sample per minute
    pub const DAY: Horizon = Horizon {
        samples: 1440,
        cadence_seconds: 60,
    };

    pub fn new(samples: usize, cadence_seconds: u32) -> Self {
        Self {
            samples,
            cadence_seconds,
        }
    }

    /// Seconds from the epoch to sample `index`
    pub fn offset_seconds(&self, index: usize) -> f64 {
        index as f64 * self.cadence_seconds as f64
    }

    /// Absolute time of sample `index`
    pub fn sample_time(&self, epoch: DateTime<Utc>, index: usize) -> DateTime<Utc> {
        epoch + Duration::seconds(index as i64 * self.cadence_seconds as i64)
    }

    /// Total covered time in seconds, `None` if it overflows `u64`
    pub fn duration_seconds(&self) -> Option<u64> {
        u64::try_from(self.samples)
            .ok()?
            .checked_mul(self.cadence_seconds as u64)
    }

    pub fn fits_in_day(&self) -> bool {
        self.duration_seconds()
            .is_some_and(|d| d <= SECONDS_PER_DAY as u64)
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Self::DAY
    }
}

/// Local solar time of the ascending node, written "HH:MM"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSolarTime {
    pub hours: u8,
    pub minutes: u8,
}

impl LocalSolarTime {
    pub fn seconds_of_day(&self) -> u32 {
        self.hours as u32 * 3600 + self.minutes as u32 * 60
    }

    /// Phase offset in radians, in [0, 2π)
    pub fn phase_rad(&self) -> f64 {
        self.seconds_of_day() as f64 / SECONDS_PER_DAY as f64 * TAU
    }
}

impl FromStr for LocalSolarTime {
    type Err = OrbitalError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || OrbitalError::InvalidLocalSolarTime(s.to_string());

        let (hh, mm) = s.trim().split_once(':').ok_or_else(invalid)?;
        if hh.is_empty() || mm.len() != 2 || hh.len() > 2 {
            return Err(invalid());
        }
        let hours: u8 = hh.parse().map_err(|_| invalid())?;
        let minutes: u8 = mm.parse().map_err(|_| invalid())?;
        if hours > 23 || minutes > 59 {
            return Err(invalid());
        }

        Ok(Self { hours, minutes })
    }
}

impl fmt::Display for LocalSolarTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

/// Julian date (UT1 ≈ UTC) of an instant
pub fn julian_date(time: DateTime<Utc>) -> f64 {
    let seconds = time.timestamp() as f64 + time.timestamp_subsec_nanos() as f64 * 1e-9;
    seconds / SECONDS_PER_DAY as f64 + JD_UNIX_EPOCH
}

/// Greenwich mean sidereal time (IAU-82) in radians, in [0, 2π)
pub fn gmst(time: DateTime<Utc>) -> f64 {
    let t = (julian_date(time) - JD_J2000) / 36525.0;

    // GMST in seconds of time
    let gmst_sec = 67310.54841
        + (876600.0 * 3600.0 + 8640184.812866) * t
        + 0.093104 * t * t
        - 6.2e-6 * t * t * t;

    // 240 seconds of time per degree
    let gmst_rad = (gmst_sec / 240.0) * (PI / 180.0);
    gmst_rad.rem_euclid(TAU)
}
