//! Beacon-to-relay cone visibility
//!
//! Two link geometries are supported and kept separate:
//!
//! - [`ConeVisibility`]: the angle between the beacon and relay position
//!   vectors (both from Earth's center) is within the cone half-angle.
//!   This is the default and drives the reported statistics.
//! - [`ZenithConeVisibility`]: the beacon→relay vector lies within the
//!   half-angle of the beacon's zenith, optionally capped by range.
//!
//! The two are not equivalent: the first compares ground-track
//! separation, the second an antenna pointed straight up.

use nalgebra::Vector3;
use orbital_mechanics::EcefPosition;
use serde::{Deserialize, Serialize};

/// Slack for rounding at exactly-collinear geometry (rad)
const ANGLE_TOLERANCE_RAD: f64 = 1e-7;

pub trait VisibilityModel: Send + Sync {
    fn in_view(&self, beacon: &EcefPosition, relay: &EcefPosition) -> bool;
}

/// Angle between two vectors in radians.
///
/// The cosine ratio is clamped to [-1, 1] before `acos`. Returns `None`
/// for a zero-length (or non-finite) input.
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> Option<f64> {
    let norms = a.norm() * b.norm();
    if !(norms.is_finite() && norms > 0.0) {
        return None;
    }
    let ratio = a.dot(b) / norms;
    if ratio.is_nan() {
        return None;
    }
    Some(ratio.clamp(-1.0, 1.0).acos())
}

fn within_cone(angle_rad: Option<f64>, half_angle_rad: f64) -> bool {
    angle_rad.is_some_and(|angle| angle <= half_angle_rad + ANGLE_TOLERANCE_RAD)
}

/// Position-vector angle test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConeVisibility {
    half_angle_rad: f64,
}

impl ConeVisibility {
    pub fn new(half_angle_deg: f64) -> Self {
        Self {
            half_angle_rad: half_angle_deg.to_radians(),
        }
    }

    pub fn half_angle_deg(&self) -> f64 {
        self.half_angle_rad.to_degrees()
    }
}

impl VisibilityModel for ConeVisibility {
    fn in_view(&self, beacon: &EcefPosition, relay: &EcefPosition) -> bool {
        within_cone(
            angle_between(&beacon.to_vector(), &relay.to_vector()),
            self.half_angle_rad,
        )
    }
}

/// Zenith-pointing antenna test with optional range cap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZenithConeVisibility {
    half_angle_rad: f64,
    max_range_m: Option<f64>,
}

impl ZenithConeVisibility {
    pub fn new(half_angle_deg: f64, max_range_m: Option<f64>) -> Self {
        Self {
            half_angle_rad: half_angle_deg.to_radians(),
            max_range_m,
        }
    }
}

impl VisibilityModel for ZenithConeVisibility {
    fn in_view(&self, beacon: &EcefPosition, relay: &EcefPosition) -> bool {
        if beacon.is_sentinel() || relay.is_sentinel() {
            return false;
        }

        let zenith = beacon.to_vector();
        let line_of_sight = relay.to_vector() - zenith;
        if let Some(max_range) = self.max_range_m {
            if line_of_sight.norm() > max_range {
                return false;
            }
        }

        within_cone(angle_between(&line_of_sight, &zenith), self.half_angle_rad)
    }
}

/// Configured link geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Visibility {
    PositionAngle(ConeVisibility),
    Zenith(ZenithConeVisibility),
}

impl VisibilityModel for Visibility {
    fn in_view(&self, beacon: &EcefPosition, relay: &EcefPosition) -> bool {
        match self {
            Self::PositionAngle(cone) => cone.in_view(beacon, relay),
            Self::Zenith(cone) => cone.in_view(beacon, relay),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: f64, y: f64, z: f64) -> EcefPosition {
        EcefPosition::new(x, y, z)
    }

    #[test]
    fn test_collinear_always_visible() {
        let a = pos(1.0, 0.0, 0.0);
        for half_angle in [0.0, 0.5, 20.0, 90.0, 179.0] {
            assert!(ConeVisibility::new(half_angle).in_view(&a, &a));
        }

        // Same direction, different radii
        let beacon = pos(0.0, 6_971_000.0, 0.0);
        let relay = pos(0.0, 7_151_000.0, 0.0);
        assert!(ConeVisibility::new(0.0).in_view(&beacon, &relay));
    }

    #[test]
    fn test_opposite_never_visible() {
        let a = pos(1.0, 0.0, 0.0);
        let b = pos(-1.0, 0.0, 0.0);
        for half_angle in [0.0, 45.0, 90.0, 179.9] {
            assert!(!ConeVisibility::new(half_angle).in_view(&a, &b));
        }
    }

    #[test]
    fn test_cone_boundary() {
        let beacon = pos(1.0, 0.0, 0.0);
        let at_30 = pos(30f64.to_radians().cos(), 30f64.to_radians().sin(), 0.0);
        assert!(ConeVisibility::new(31.0).in_view(&beacon, &at_30));
        assert!(!ConeVisibility::new(29.0).in_view(&beacon, &at_30));
    }

    #[test]
    fn test_sentinel_not_visible() {
        let beacon = pos(6_971_000.0, 0.0, 0.0);
        let cone = ConeVisibility::new(179.0);
        assert!(!cone.in_view(&beacon, &EcefPosition::ZERO));
        assert!(!cone.in_view(&EcefPosition::ZERO, &beacon));
        assert!(!cone.in_view(&EcefPosition::ZERO, &EcefPosition::ZERO));
    }

    #[test]
    fn test_angle_clamped_for_near_collinear() {
        let a = Vector3::new(0.1, 0.2, 0.3);
        let b = a * 3.0;
        let angle = angle_between(&a, &b).unwrap();
        assert!(!angle.is_nan());
        assert!(angle.abs() < 1e-7);
    }

    #[test]
    fn test_angle_between_nan_input() {
        assert_eq!(angle_between(&Vector3::new(f64::NAN, 1.0, 0.0), &Vector3::x()), None);
    }

    #[test]
    fn test_zenith_cone() {
        let beacon = pos(7_000_000.0, 0.0, 0.0);
        let overhead = pos(8_000_000.0, 100_000.0, 0.0);
        let beside = pos(7_000_000.0, 1_000_000.0, 0.0);

        let cone = ZenithConeVisibility::new(20.0, None);
        assert!(cone.in_view(&beacon, &overhead));
        assert!(!cone.in_view(&beacon, &beside));
        assert!(!cone.in_view(&beacon, &EcefPosition::ZERO));

        let short = ZenithConeVisibility::new(20.0, Some(500_000.0));
        assert!(!short.in_view(&beacon, &overhead));
    }

    #[test]
    fn test_formulations_disagree() {
        // Relay beside the beacon at the same radius is close in position
        // angle but on the beacon's horizon
        let beacon = pos(7_000_000.0, 0.0, 0.0);
        let relay = pos(6_990_000.0, 300_000.0, 0.0);

        let position_angle = Visibility::PositionAngle(ConeVisibility::new(20.0));
        let zenith = Visibility::Zenith(ZenithConeVisibility::new(20.0, None));
        assert!(position_angle.in_view(&beacon, &relay));
        assert!(!zenith.in_view(&beacon, &relay));
    }
}
