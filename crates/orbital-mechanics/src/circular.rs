//! Closed-form circular orbit propagation
//!
//! Idealized beacon orbit chosen by the operator: constant radius, no
//! oblateness, drag or other perturbations. Positions are produced
//! directly in the Earth-fixed frame.
//!
//! ```text
//! r = R_E + h            T = 2π·√(r³/μ)         ω = 2π/T
//! θ(t) = ω·t + φ₀        φ₀ = LST seconds / 86400 · 2π
//! p(t) = Rz(Ω) · Rx(i) · (r·cosθ, r·sinθ, 0)
//! ```

use nalgebra::{Rotation3, Vector3};
use std::f64::consts::{PI, TAU};

use crate::constants::{EARTH_RADIUS_KM, KM_TO_M, MU_EARTH_KM3_S2};
use crate::time::{Horizon, LocalSolarTime};
use crate::{EcefPosition, OrbitalError, Result, Trajectory};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularOrbit {
    altitude_km: f64,
    inclination_deg: f64,
    local_solar_time: LocalSolarTime,
    /// RAAN-style rotation about the polar axis (rad)
    phase_offset_rad: f64,
}

impl CircularOrbit {
    /// Orbit from altitude (km), inclination (deg) and an "HH:MM" local
    /// solar time. Only degenerate geometry is rejected here; operational
    /// ranges are checked by the caller's config.
    pub fn new(altitude_km: f64, inclination_deg: f64, local_solar_time: &str) -> Result<Self> {
        if !altitude_km.is_finite() || EARTH_RADIUS_KM + altitude_km <= 0.0 {
            return Err(OrbitalError::InvalidOrbit(format!(
                "altitude {altitude_km} km gives no orbit radius"
            )));
        }
        if !inclination_deg.is_finite() {
            return Err(OrbitalError::InvalidOrbit(format!(
                "inclination {inclination_deg}° is not finite"
            )));
        }

        Ok(Self {
            altitude_km,
            inclination_deg,
            local_solar_time: local_solar_time.parse()?,
            phase_offset_rad: 0.0,
        })
    }

    pub fn with_phase_offset(mut self, phase_offset_rad: f64) -> Self {
        self.phase_offset_rad = phase_offset_rad;
        self
    }

    /// Same orbit, half a revolution of node rotation away
    pub fn anti_phase(&self) -> Self {
        self.with_phase_offset(self.phase_offset_rad + PI)
    }

    pub fn altitude_km(&self) -> f64 {
        self.altitude_km
    }

    pub fn inclination_deg(&self) -> f64 {
        self.inclination_deg
    }

    pub fn local_solar_time(&self) -> LocalSolarTime {
        self.local_solar_time
    }

    pub fn phase_offset_rad(&self) -> f64 {
        self.phase_offset_rad
    }

    pub fn radius_km(&self) -> f64 {
        EARTH_RADIUS_KM + self.altitude_km
    }

    pub fn period_seconds(&self) -> f64 {
        TAU * (self.radius_km().powi(3) / MU_EARTH_KM3_S2).sqrt()
    }

    /// Angular rate ω in rad/s
    pub fn angular_rate(&self) -> f64 {
        TAU / self.period_seconds()
    }

    /// Argument of latitude θ at `t_seconds` after the epoch
    pub fn argument_of_latitude(&self, t_seconds: f64) -> f64 {
        self.angular_rate() * t_seconds + self.local_solar_time.phase_rad()
    }

    /// Earth-fixed position in meters at `t_seconds` after the epoch
    pub fn position_at(&self, t_seconds: f64) -> EcefPosition {
        let r = self.radius_km();
        let theta = self.argument_of_latitude(t_seconds);
        let in_plane = Vector3::new(r * theta.cos(), r * theta.sin(), 0.0);

        // Rotations only, so 0° and 180° inclinations need no special case
        let tilt = Rotation3::from_axis_angle(&Vector3::x_axis(), self.inclination_deg.to_radians());
        let node = Rotation3::from_axis_angle(&Vector3::z_axis(), self.phase_offset_rad);

        EcefPosition::from(node * tilt * in_plane * KM_TO_M)
    }

    pub fn propagate(&self, horizon: &Horizon) -> Trajectory {
        Trajectory::from_samples(horizon, |i| Some(self.position_at(horizon.offset_seconds(i))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn beacon() -> CircularOrbit {
        CircularOrbit::new(600.0, 97.5, "11:00").unwrap()
    }

    #[test]
    fn test_trajectory_length_and_radius() {
        let orbit = beacon();
        let traj = orbit.propagate(&Horizon::DAY);
        assert_eq!(traj.len(), 1440);
        assert_eq!(traj.gap_count(), 0);

        let expected_m = (EARTH_RADIUS_KM + 600.0) * KM_TO_M;
        for pos in traj.positions() {
            assert!((pos.radius() - expected_m).abs() < 1e-6 * expected_m);
        }
    }

    #[test]
    fn test_orbital_period() {
        // 600 km LEO: ~96.5 minutes
        let period_min = beacon().period_seconds() / 60.0;
        assert!(period_min > 96.0 && period_min < 97.0, "Period {period_min} min");
    }

    #[test]
    fn test_initial_phase_from_lst() {
        // 06:00 LST is a quarter turn along the orbit
        let orbit = CircularOrbit::new(500.0, 0.0, "06:00").unwrap();
        let p = orbit.position_at(0.0);
        let r_m = orbit.radius_km() * KM_TO_M;
        assert!(p.x.abs() < 1e-6 * r_m);
        assert!((p.y - r_m).abs() < 1e-6 * r_m);
    }

    #[test]
    fn test_equatorial_and_retrograde_stay_in_plane() {
        for inc in [0.0, 180.0] {
            let orbit = CircularOrbit::new(700.0, inc, "03:15").unwrap();
            for pos in orbit.propagate(&Horizon::new(120, 60)).positions() {
                assert!(pos.z.abs() < 1e-6, "inclination {inc}: z = {}", pos.z);
                assert!(pos.x.is_finite() && pos.y.is_finite());
            }
        }
    }

    #[test]
    fn test_polar_orbit_reaches_pole() {
        let orbit = CircularOrbit::new(600.0, 90.0, "06:00").unwrap();
        let p = orbit.position_at(0.0);
        let r_m = orbit.radius_km() * KM_TO_M;
        assert!((p.z - r_m).abs() < 1e-6 * r_m);
    }

    #[test]
    fn test_anti_phase_mirrors_in_xy() {
        let main = beacon();
        let opposite = main.anti_phase();
        assert!((opposite.phase_offset_rad() - PI).abs() < 1e-15);

        for t in [0.0, 600.0, 4321.0] {
            let a = main.position_at(t);
            let b = opposite.position_at(t);
            assert!((a.x + b.x).abs() < 1e-3);
            assert!((a.y + b.y).abs() < 1e-3);
            assert!((a.z - b.z).abs() < 1e-3);
        }
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(matches!(
            CircularOrbit::new(600.0, 45.0, "noon"),
            Err(OrbitalError::InvalidLocalSolarTime(_))
        ));
        assert!(matches!(
            CircularOrbit::new(f64::NAN, 45.0, "12:00"),
            Err(OrbitalError::InvalidOrbit(_))
        ));
        assert!(matches!(
            CircularOrbit::new(-7000.0, 45.0, "12:00"),
            Err(OrbitalError::InvalidOrbit(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_constant_radius(
            altitude_km in 200.0f64..36_000.0,
            inclination_deg in 0.0f64..=180.0,
            hours in 0u8..24,
            minutes in 0u8..60,
            phase in 0.0f64..TAU,
        ) {
            let lst = format!("{hours:02}:{minutes:02}");
            let orbit = CircularOrbit::new(altitude_km, inclination_deg, &lst)
                .unwrap()
                .with_phase_offset(phase);
            let traj = orbit.propagate(&Horizon::DAY);
            prop_assert_eq!(traj.len(), 1440);

            let expected_m = (EARTH_RADIUS_KM + altitude_km) * KM_TO_M;
            for pos in traj.positions() {
                prop_assert!((pos.radius() - expected_m).abs() < 1e-6 * expected_m);
            }
        }
    }
}
