//! Two-body implementations of the guidance collaborators.

use burnsim_core::StateVector;
use burnsim_core::vector;
use burnsim_guidance::{ManeuverPlanner, OrbitSnapshotProvider, PlannedTransfer, TargetOrbit};
use burnsim_impulsive::{apoapsis_raise, hohmann};
use burnsim_orbits::{OrbitSnapshot, elements_from_state};
use log::debug;

/// Below this eccentricity the start orbit is treated as circular.
const CIRCULAR_ECCENTRICITY: f64 = 1e-9;

/// Snapshot provider computing Keplerian elements about a point mass.
#[derive(Debug, Clone, Copy)]
pub struct KeplerSnapshot {
    pub mu_km3_s2: f64,
}

impl KeplerSnapshot {
    pub fn new(mu_km3_s2: f64) -> Self {
        Self { mu_km3_s2 }
    }
}

impl OrbitSnapshotProvider for KeplerSnapshot {
    fn snapshot(&self, state: &StateVector) -> OrbitSnapshot {
        OrbitSnapshot::from(&elements_from_state(state, self.mu_km3_s2))
    }
}

/// Plans the first Hohmann burn from the vehicle's current point, along its velocity.
#[derive(Debug, Clone, Copy)]
pub struct HohmannPlanner {
    pub mu_km3_s2: f64,
    pub burn_duration_hint_s: Option<f64>,
}

impl HohmannPlanner {
    pub fn new(mu_km3_s2: f64) -> Self {
        Self {
            mu_km3_s2,
            burn_duration_hint_s: None,
        }
    }

    pub fn with_duration_hint(mut self, seconds: f64) -> Self {
        self.burn_duration_hint_s = Some(seconds);
        self
    }
}

impl ManeuverPlanner for HohmannPlanner {
    fn plan_transfer(
        &self,
        current: &StateVector,
        target: &TargetOrbit,
    ) -> Option<PlannedTransfer> {
        let elements = elements_from_state(current, self.mu_km3_s2);
        if elements.apoapsis_km >= target.radius_km {
            debug!(
                "apoapsis {:.3} km already at or beyond target {:.3} km",
                elements.apoapsis_km, target.radius_km
            );
            return None;
        }

        let dv_km_s = if elements.eccentricity < CIRCULAR_ECCENTRICITY {
            hohmann(current.radius_km(), target.radius_km, self.mu_km3_s2)
                .ok()?
                .dv1_km_s
        } else {
            apoapsis_raise(
                current.radius_km(),
                current.speed_km_s(),
                target.radius_km,
                self.mu_km3_s2,
            )
            .ok()?
            .dv_km_s
        };
        if dv_km_s <= 0.0 {
            return None;
        }
        let direction = vector::normalize(&current.velocity_km_s)?;

        Some(PlannedTransfer {
            delta_v_km_s: dv_km_s,
            burn_vector: vector::scale(&direction, dv_km_s),
            burn_duration_hint_s: self.burn_duration_hint_s,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use burnsim_core::constants::MU_EARTH_KM3_S2;
    use burnsim_orbits::circular_state;

    #[test]
    fn planner_matches_hohmann_from_circular_orbit() {
        let planner = HohmannPlanner::new(MU_EARTH_KM3_S2);
        let state = circular_state(7_000.0, MU_EARTH_KM3_S2);
        let transfer = planner
            .plan_transfer(&state, &TargetOrbit { radius_km: 10_000.0 })
            .expect("transfer");
        let expected = hohmann(7_000.0, 10_000.0, MU_EARTH_KM3_S2).unwrap();
        assert_relative_eq!(transfer.delta_v_km_s, expected.dv1_km_s, epsilon = 1e-12);
        assert_relative_eq!(transfer.burn_vector[1], expected.dv1_km_s, epsilon = 1e-12);
        assert_eq!(transfer.burn_duration_hint_s, None);
    }

    #[test]
    fn planner_sizes_elliptic_start_from_current_speed() {
        let planner = HohmannPlanner::new(MU_EARTH_KM3_S2);
        let mut state = circular_state(7_000.0, MU_EARTH_KM3_S2);
        state.velocity_km_s[1] *= 1.02;
        let transfer = planner
            .plan_transfer(&state, &TargetOrbit { radius_km: 10_000.0 })
            .expect("transfer");
        let raise =
            apoapsis_raise(7_000.0, state.speed_km_s(), 10_000.0, MU_EARTH_KM3_S2).unwrap();
        let circular = hohmann(7_000.0, 10_000.0, MU_EARTH_KM3_S2).unwrap();
        assert_relative_eq!(transfer.delta_v_km_s, raise.dv_km_s, epsilon = 1e-12);
        assert!(transfer.delta_v_km_s < circular.dv1_km_s);
    }

    #[test]
    fn planner_has_nothing_to_do_when_target_reached() {
        let planner = HohmannPlanner::new(MU_EARTH_KM3_S2).with_duration_hint(60.0);
        let state = circular_state(10_000.0, MU_EARTH_KM3_S2);
        assert!(
            planner
                .plan_transfer(&state, &TargetOrbit { radius_km: 9_000.0 })
                .is_none()
        );
    }

    #[test]
    fn snapshot_reports_circular_apogee() {
        let provider = KeplerSnapshot::new(MU_EARTH_KM3_S2);
        let snapshot = provider.snapshot(&circular_state(7_000.0, MU_EARTH_KM3_S2));
        assert_relative_eq!(snapshot.apogee_radius_km, 7_000.0, epsilon = 1e-6);
        assert!(snapshot.eccentricity < 1e-12);
    }
}
