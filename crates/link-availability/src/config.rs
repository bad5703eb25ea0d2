//! Simulation configuration
//!
//! Built by the caller (CLI flags or a JSON file) and validated once
//! before a run. Invalid values are rejected, never clamped.

use orbital_mechanics::constants::SUN_SYNCHRONOUS_INCLINATION_DEG;
use orbital_mechanics::time::LocalSolarTime;
use orbital_mechanics::{CircularOrbit, Horizon};
use serde::{Deserialize, Serialize};

use crate::visibility::{ConeVisibility, Visibility, ZenithConeVisibility};
use crate::{LinkError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrbitSelection {
    /// Fixed 97.5° inclination
    SunSynchronous,
    Inclined { inclination_deg: f64 },
}

impl OrbitSelection {
    pub fn inclination_deg(&self) -> f64 {
        match self {
            Self::SunSynchronous => SUN_SYNCHRONOUS_INCLINATION_DEG,
            Self::Inclined { inclination_deg } => *inclination_deg,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisibilityFormulation {
    /// Angle between beacon and relay position vectors
    #[default]
    PositionAngle,
    /// Beacon→relay vector against the beacon zenith
    Zenith { max_range_km: Option<f64> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub altitude_km: f64,
    pub orbit: OrbitSelection,
    /// "HH:MM"
    pub local_solar_time: String,
    pub cone_half_angle_deg: f64,
    #[serde(default)]
    pub visibility: VisibilityFormulation,
    #[serde(default)]
    pub horizon: Horizon,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            altitude_km: 600.0,
            orbit: OrbitSelection::SunSynchronous,
            local_solar_time: "11:00".to_string(),
            cone_half_angle_deg: 20.0,
            visibility: VisibilityFormulation::default(),
            horizon: Horizon::DAY,
        }
    }
}

fn invalid(msg: String) -> LinkError {
    LinkError::InvalidConfig(msg)
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.altitude_km.is_finite() && self.altitude_km > 0.0) {
            return Err(invalid(format!(
                "altitude_km must be a positive number, got {}",
                self.altitude_km
            )));
        }

        let inclination = self.orbit.inclination_deg();
        if !(0.0..=180.0).contains(&inclination) {
            return Err(invalid(format!(
                "inclination_deg must be within [0, 180], got {inclination}"
            )));
        }

        if !(0.0..180.0).contains(&self.cone_half_angle_deg) {
            return Err(invalid(format!(
                "cone_half_angle_deg must be within [0, 180), got {}",
                self.cone_half_angle_deg
            )));
        }

        self.local_solar_time.parse::<LocalSolarTime>()?;

        if let VisibilityFormulation::Zenith {
            max_range_km: Some(range),
        } = self.visibility
        {
            if !(range.is_finite() && range > 0.0) {
                return Err(invalid(format!(
                    "max_range_km must be a positive number, got {range}"
                )));
            }
        }

        let horizon = self.horizon;
        if horizon.samples == 0 || horizon.cadence_seconds == 0 {
            return Err(invalid(format!(
                "horizon needs at least one sample and a non-zero cadence, got {} x {} s",
                horizon.samples, horizon.cadence_seconds
            )));
        }
        if !horizon.fits_in_day() {
            return Err(invalid(match horizon.duration_seconds() {
                Some(seconds) => format!("horizon of {seconds} s exceeds 24 hours"),
                None => format!(
                    "horizon of {} x {} s exceeds 24 hours",
                    horizon.samples, horizon.cadence_seconds
                ),
            }));
        }

        Ok(())
    }

    /// Primary beacon orbit; the second beacon is its anti-phase twin
    pub fn beacon_orbit(&self) -> Result<CircularOrbit> {
        Ok(CircularOrbit::new(
            self.altitude_km,
            self.orbit.inclination_deg(),
            &self.local_solar_time,
        )?)
    }

    pub fn visibility_model(&self) -> Visibility {
        match self.visibility {
            VisibilityFormulation::PositionAngle => {
                Visibility::PositionAngle(ConeVisibility::new(self.cone_half_angle_deg))
            }
            VisibilityFormulation::Zenith { max_range_km } => Visibility::Zenith(
                ZenithConeVisibility::new(self.cone_half_angle_deg, max_range_km.map(|km| km * 1000.0)),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.orbit.inclination_deg(), 97.5);
        assert_eq!(config.horizon, Horizon::DAY);
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad = [
            SimulationConfig { altitude_km: 0.0, ..Default::default() },
            SimulationConfig { altitude_km: f64::NAN, ..Default::default() },
            SimulationConfig {
                orbit: OrbitSelection::Inclined { inclination_deg: 181.0 },
                ..Default::default()
            },
            SimulationConfig { cone_half_angle_deg: 180.0, ..Default::default() },
            SimulationConfig { cone_half_angle_deg: -1.0, ..Default::default() },
            SimulationConfig { local_solar_time: "25:00".into(), ..Default::default() },
            SimulationConfig { horizon: Horizon::new(0, 60), ..Default::default() },
            SimulationConfig { horizon: Horizon::new(2880, 60), ..Default::default() },
            SimulationConfig {
                visibility: VisibilityFormulation::Zenith { max_range_km: Some(-5.0) },
                ..Default::default()
            },
        ];

        for config in bad {
            assert!(config.validate().is_err(), "{config:?} should be rejected");
        }
    }

    #[test]
    fn test_rejects_overflowing_horizon() {
        let json = r#"{
            "altitude_km": 600.0,
            "orbit": { "kind": "sun_synchronous" },
            "local_solar_time": "11:00",
            "cone_half_angle_deg": 20.0,
            "horizon": { "samples": 18446744073709551615, "cadence_seconds": 60 }
        }"#;
        let config: SimulationConfig = serde_json::from_str(json).unwrap();
        match config.validate() {
            Err(LinkError::InvalidConfig(msg)) => assert!(msg.contains("exceeds 24 hours")),
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_lst_reports_orbital_error() {
        let config = SimulationConfig { local_solar_time: "noon".into(), ..Default::default() };
        assert!(matches!(config.validate(), Err(LinkError::Orbital(_))));
    }

    #[test]
    fn test_json_round_trip_with_defaults() {
        let json = r#"{
            "altitude_km": 550.0,
            "orbit": { "kind": "inclined", "inclination_deg": 45.0 },
            "local_solar_time": "13:30",
            "cone_half_angle_deg": 15.0
        }"#;
        let config: SimulationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.orbit.inclination_deg(), 45.0);
        assert_eq!(config.visibility, VisibilityFormulation::PositionAngle);
        assert_eq!(config.horizon, Horizon::DAY);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_visibility_model_selection() {
        let config = SimulationConfig {
            visibility: VisibilityFormulation::Zenith { max_range_km: Some(3000.0) },
            ..Default::default()
        };
        assert!(matches!(config.visibility_model(), Visibility::Zenith(_)));
        assert!(matches!(
            SimulationConfig::default().visibility_model(),
            Visibility::PositionAngle(_)
        ));
    }
}
