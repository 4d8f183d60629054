//! Two-body orbit helpers: classical elements from Cartesian state and the per-tick snapshot
//! consumed by guidance.
use std::f64::consts::{PI, TAU};

use burnsim_core::StateVector;
use burnsim_core::vector::{self, Vector3};
use serde::{Deserialize, Serialize};

/// Eccentricity and node magnitudes below this are treated as zero.
const SINGULARITY_TOLERANCE: f64 = 1.0e-9;

/// Classical elements for a body orbiting a point-mass central body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    /// Negative for hyperbolic orbits, infinite for parabolic ones.
    pub semi_major_axis_km: f64,
    pub eccentricity: f64,
    pub inclination_rad: f64,
    /// Argument of periapsis, or longitude of periapsis for equatorial orbits, in `[0, 2π)`.
    pub arg_periapsis_rad: f64,
    pub periapsis_km: f64,
    /// `f64::INFINITY` when the orbit is not bound.
    pub apoapsis_km: f64,
    pub specific_energy_km2_s2: f64,
}

impl OrbitalElements {
    pub fn is_bound(&self) -> bool {
        self.eccentricity < 1.0 && self.specific_energy_km2_s2 < 0.0
    }
}

/// The slice of orbital state guidance reads every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitSnapshot {
    pub apogee_radius_km: f64,
    pub eccentricity: f64,
    /// Argument-of-periapsis-like orientation angle (radians).
    pub phase_angle_rad: f64,
}

impl From<&OrbitalElements> for OrbitSnapshot {
    fn from(elements: &OrbitalElements) -> Self {
        Self {
            apogee_radius_km: elements.apoapsis_km,
            eccentricity: elements.eccentricity,
            phase_angle_rad: elements.arg_periapsis_rad,
        }
    }
}

/// Compute classical elements from a Cartesian state.
///
/// Uses the eccentricity vector `e = (v × h)/μ − r̂`. When the line of nodes is undefined
/// (equatorial orbit) the longitude of periapsis is reported instead of the argument of
/// periapsis; a circular orbit reports zero.
pub fn elements_from_state(state: &StateVector, mu_km3_s2: f64) -> OrbitalElements {
    let r_vec = state.position_km;
    let v_vec = state.velocity_km_s;
    let r = vector::norm(&r_vec);
    let v2 = vector::dot(&v_vec, &v_vec);

    let h_vec = vector::cross(&r_vec, &v_vec);
    let h = vector::norm(&h_vec);

    let e_vec = vector::sub(
        &vector::scale(&vector::cross(&v_vec, &h_vec), 1.0 / mu_km3_s2),
        &vector::scale(&r_vec, 1.0 / r),
    );
    let e = vector::norm(&e_vec);

    let energy = 0.5 * v2 - mu_km3_s2 / r;
    let semi_major_axis = if energy.abs() > f64::EPSILON {
        -mu_km3_s2 / (2.0 * energy)
    } else {
        f64::INFINITY
    };

    let semi_latus_rectum = h * h / mu_km3_s2;
    let periapsis = semi_latus_rectum / (1.0 + e);
    let apoapsis = if e < 1.0 && energy < 0.0 {
        semi_major_axis * (1.0 + e)
    } else {
        f64::INFINITY
    };

    let inclination = if h > 0.0 {
        (h_vec[2] / h).clamp(-1.0, 1.0).acos()
    } else {
        0.0
    };

    OrbitalElements {
        semi_major_axis_km: semi_major_axis,
        eccentricity: e,
        inclination_rad: inclination,
        arg_periapsis_rad: periapsis_angle(&h_vec, &e_vec, e),
        periapsis_km: periapsis,
        apoapsis_km: apoapsis,
        specific_energy_km2_s2: energy,
    }
}

fn periapsis_angle(h_vec: &Vector3, e_vec: &Vector3, e: f64) -> f64 {
    if e < SINGULARITY_TOLERANCE {
        return 0.0;
    }
    let node = vector::cross(&vector::UNIT_Z, h_vec);
    let n = vector::norm(&node);
    let angle = if n > SINGULARITY_TOLERANCE * vector::norm(h_vec) {
        let cos_omega = (vector::dot(&node, e_vec) / (n * e)).clamp(-1.0, 1.0);
        let omega = cos_omega.acos();
        if e_vec[2] < 0.0 { TAU - omega } else { omega }
    } else {
        // equatorial
        let lon = e_vec[1].atan2(e_vec[0]);
        if h_vec[2] < 0.0 { -lon } else { lon }
    };
    wrap_two_pi(angle)
}

/// Wrap an angle into `[0, 2π)`.
pub fn wrap_two_pi(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Wrap an angle into `(-π, π]`, used for phase differences.
pub fn wrap_pi(angle: f64) -> f64 {
    let wrapped = wrap_two_pi(angle);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

/// Prograde circular state in the XY plane, starting on the +X axis.
pub fn circular_state(radius_km: f64, mu_km3_s2: f64) -> StateVector {
    let speed = (mu_km3_s2 / radius_km).sqrt();
    StateVector::new([radius_km, 0.0, 0.0], [0.0, speed, 0.0])
}

/// Circular orbital speed at `radius_km`.
pub fn circular_speed(radius_km: f64, mu_km3_s2: f64) -> f64 {
    (mu_km3_s2 / radius_km).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use burnsim_core::constants::MU_EARTH_KM3_S2;

    #[test]
    fn circular_orbit_has_zero_eccentricity() {
        let state = circular_state(7_000.0, MU_EARTH_KM3_S2);
        let el = elements_from_state(&state, MU_EARTH_KM3_S2);
        assert!(el.eccentricity < 1e-12);
        assert_relative_eq!(el.semi_major_axis_km, 7_000.0, epsilon = 1e-6);
        assert_relative_eq!(el.apoapsis_km, 7_000.0, epsilon = 1e-6);
        assert_eq!(el.arg_periapsis_rad, 0.0);
    }

    #[test]
    fn prograde_kick_at_periapsis_raises_apoapsis() {
        let mut state = circular_state(7_000.0, MU_EARTH_KM3_S2);
        // Hohmann injection speed towards 10 000 km.
        let a_t: f64 = 8_500.0;
        let v_t = (MU_EARTH_KM3_S2 * (2.0 / 7_000.0 - 1.0 / a_t)).sqrt();
        state.velocity_km_s = [0.0, v_t, 0.0];

        let el = elements_from_state(&state, MU_EARTH_KM3_S2);
        assert_relative_eq!(el.apoapsis_km, 10_000.0, epsilon = 1e-6);
        assert_relative_eq!(el.periapsis_km, 7_000.0, epsilon = 1e-6);
        assert_relative_eq!(el.eccentricity, 3_000.0 / 17_000.0, epsilon = 1e-9);
        // Periapsis sits on +X for an equatorial prograde orbit.
        assert!(el.arg_periapsis_rad < 1e-9 || (TAU - el.arg_periapsis_rad) < 1e-9);
        assert!(el.is_bound());
    }

    #[test]
    fn escape_speed_is_reported_unbound() {
        let r = 7_000.0;
        let v_esc = (2.0 * MU_EARTH_KM3_S2 / r).sqrt();
        let state = StateVector::new([r, 0.0, 0.0], [0.0, v_esc * 1.1, 0.0]);
        let el = elements_from_state(&state, MU_EARTH_KM3_S2);
        assert!(el.eccentricity > 1.0);
        assert!(el.apoapsis_km.is_infinite());
        assert!(!el.is_bound());
    }

    #[test]
    fn phase_angle_tracks_periapsis_direction() {
        // Periapsis on +Y: start there with a super-circular prograde velocity.
        let r = 7_000.0;
        let v = circular_speed(r, MU_EARTH_KM3_S2) * 1.05;
        let state = StateVector::new([0.0, r, 0.0], [-v, 0.0, 0.0]);
        let snapshot = OrbitSnapshot::from(&elements_from_state(&state, MU_EARTH_KM3_S2));
        assert_relative_eq!(snapshot.phase_angle_rad, PI / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn inclined_orbit_uses_node_line() {
        // Periapsis at the ascending node of a polar orbit gives ω = 0.
        let r = 7_000.0;
        let v = circular_speed(r, MU_EARTH_KM3_S2) * 1.1;
        let state = StateVector::new([r, 0.0, 0.0], [0.0, 0.0, v]);
        let el = elements_from_state(&state, MU_EARTH_KM3_S2);
        assert_relative_eq!(el.inclination_rad, PI / 2.0, epsilon = 1e-12);
        assert!(el.arg_periapsis_rad < 1e-9 || (TAU - el.arg_periapsis_rad) < 1e-9);
    }

    #[test]
    fn wrap_pi_maps_into_half_open_interval() {
        assert_relative_eq!(wrap_pi(3.0 * PI / 2.0), -PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(wrap_pi(-PI / 2.0), -PI / 2.0, epsilon = 1e-12);
        assert_relative_eq!(wrap_pi(PI), PI, epsilon = 1e-12);
    }
}
