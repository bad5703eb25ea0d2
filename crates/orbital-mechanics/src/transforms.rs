//! Inertial (TEME/ECI) to Earth-fixed (ECEF) conversion

use nalgebra::{Rotation3, Vector3};

use crate::EcefPosition;

/// Rotate an inertial position into the Earth-fixed frame.
///
/// Applies a rotation of `-gmst_rad` about the polar (z) axis. Units are
/// preserved; NaN inputs propagate.
pub fn eci_to_ecef(eci: Vector3<f64>, gmst_rad: f64) -> Vector3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), -gmst_rad) * eci
}

/// Inverse of [`eci_to_ecef`]
pub fn ecef_to_eci(ecef: &EcefPosition, gmst_rad: f64) -> Vector3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), gmst_rad) * ecef.to_vector()
}
