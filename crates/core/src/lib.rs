//! Core units, constants, and shared primitives for the finite-burn simulator workspace.

/// Physical constants.
pub mod constants {
    /// Earth gravitational parameter (km³/s²).
    pub const MU_EARTH_KM3_S2: f64 = 398_600.441_8;
}

/// Basic unit conversion helpers.
pub mod units {
    /// Convert metres to kilometres.
    #[inline]
    pub fn m_to_km(v: f64) -> f64 {
        v / 1_000.0
    }

    /// Acceleration in km/s² produced by a force (N) acting on a mass (kg).
    #[inline]
    pub fn force_to_accel_km_s2(force_newtons: f64, mass_kg: f64) -> f64 {
        m_to_km(force_newtons / mass_kg)
    }
}

/// Conversion between simulation time and world (wall-clock mission) seconds.
pub mod time {
    use serde::{Deserialize, Serialize};

    /// Linear mapping between simulation time units and world seconds.
    ///
    /// The simulation integrates in its own time units; humans read reports in world
    /// seconds. Control decisions never depend on the world-side value.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct TimeScale {
        world_seconds_per_sim_unit: f64,
    }

    impl TimeScale {
        /// Build a scale; non-positive or non-finite factors collapse to identity.
        pub fn new(world_seconds_per_sim_unit: f64) -> Self {
            let valid = world_seconds_per_sim_unit.is_finite() && world_seconds_per_sim_unit > 0.0;
            Self {
                world_seconds_per_sim_unit: if valid { world_seconds_per_sim_unit } else { 1.0 },
            }
        }

        /// One simulation unit per world second.
        pub fn identity() -> Self {
            Self::new(1.0)
        }

        pub fn world_seconds_per_sim_unit(&self) -> f64 {
            self.world_seconds_per_sim_unit
        }

        #[inline]
        pub fn sim_to_world_seconds(&self, sim_time: f64) -> f64 {
            sim_time * self.world_seconds_per_sim_unit
        }

        #[inline]
        pub fn world_seconds_to_sim(&self, world_seconds: f64) -> f64 {
            world_seconds / self.world_seconds_per_sim_unit
        }
    }

    impl Default for TimeScale {
        fn default() -> Self {
            Self::identity()
        }
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D vector in kilometres or km/s depending on context.
    pub type Vector3 = [f64; 3];

    /// Zero vector.
    pub const ZERO: Vector3 = [0.0, 0.0, 0.0];

    /// Unit vector along +Z, the default out-of-plane reference axis.
    pub const UNIT_Z: Vector3 = [0.0, 0.0, 1.0];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Cross product `a × b`.
    #[inline]
    pub fn cross(a: &Vector3, b: &Vector3) -> Vector3 {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    /// Vector addition.
    #[inline]
    pub fn add(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// Negate a vector.
    #[inline]
    pub fn neg(v: &Vector3) -> Vector3 {
        scale(v, -1.0)
    }

    /// True when every component is finite.
    #[inline]
    pub fn is_finite(v: &Vector3) -> bool {
        v.iter().all(|c| c.is_finite())
    }

    /// Unit vector along `v`, or `None` for zero-length or non-finite input.
    pub fn normalize(v: &Vector3) -> Option<Vector3> {
        let n = norm(v);
        if n > f64::EPSILON && n.is_finite() {
            Some(scale(v, 1.0 / n))
        } else {
            None
        }
    }
}

/// Cartesian state of a body relative to the central body.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StateVector {
    pub position_km: vector::Vector3,
    pub velocity_km_s: vector::Vector3,
}

impl StateVector {
    pub fn new(position_km: vector::Vector3, velocity_km_s: vector::Vector3) -> Self {
        Self {
            position_km,
            velocity_km_s,
        }
    }

    /// Distance from the central body (km).
    pub fn radius_km(&self) -> f64 {
        vector::norm(&self.position_km)
    }

    /// Speed relative to the central body (km/s).
    pub fn speed_km_s(&self) -> f64 {
        vector::norm(&self.velocity_km_s)
    }
}

#[cfg(test)]
mod tests {
    use super::time::TimeScale;
    use super::vector::{self, UNIT_Z};
    use approx::assert_relative_eq;

    #[test]
    fn cross_follows_right_hand_rule() {
        let x = [1.0, 0.0, 0.0];
        let y = [0.0, 1.0, 0.0];
        assert_eq!(vector::cross(&x, &y), UNIT_Z);
        assert_eq!(vector::cross(&UNIT_Z, &x), y);
    }

    #[test]
    fn normalize_rejects_zero_length() {
        assert!(vector::normalize(&vector::ZERO).is_none());
        assert!(vector::normalize(&[f64::NAN, 0.0, 0.0]).is_none());
        let unit = vector::normalize(&[3.0, 4.0, 0.0]).unwrap();
        assert_relative_eq!(vector::norm(&unit), 1.0, epsilon = 1e-12);
        assert_relative_eq!(unit[0], 0.6, epsilon = 1e-12);
    }

    #[test]
    fn time_scale_round_trips_and_guards_factor() {
        let scale = TimeScale::new(10.0);
        assert_relative_eq!(scale.sim_to_world_seconds(6.0), 60.0);
        assert_relative_eq!(scale.world_seconds_to_sim(60.0), 6.0);

        let degenerate = TimeScale::new(0.0);
        assert_eq!(degenerate, TimeScale::identity());
    }
}
