//! Interfaces to everything the controller drives or reads but does not own.
//!
//! Every call is synchronous and completes within the tick that issued it.

use std::fmt;

use burnsim_core::StateVector;
use burnsim_core::vector::Vector3;
use burnsim_orbits::OrbitSnapshot;
use serde::Serialize;

/// Handle naming a body inside whatever world the collaborators wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BodyId(pub usize);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Target description handed to the planner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TargetOrbit {
    pub radius_km: f64,
}

/// Idealized instantaneous maneuver returned by a planner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlannedTransfer {
    pub delta_v_km_s: f64,
    /// Velocity change to apply in one shot, `delta_v_km_s` long.
    pub burn_vector: Vector3,
    /// Suggested burn duration in world seconds.
    pub burn_duration_hint_s: Option<f64>,
}

/// Derives orbital elements from a live state. Called every tick.
pub trait OrbitSnapshotProvider {
    fn snapshot(&self, state: &StateVector) -> OrbitSnapshot;
}

/// Sizes the idealized impulsive transfer. Called once per session.
///
/// `None` means there is nothing to do, e.g. the target is already reached.
pub trait ManeuverPlanner {
    fn plan_transfer(&self, current: &StateVector, target: &TargetOrbit)
    -> Option<PlannedTransfer>;
}

/// Mutates vehicle kinematics. The only write path into the world.
pub trait Actuator {
    /// Instantaneous velocity change.
    fn apply_impulse(&mut self, body: BodyId, delta_v_km_s: Vector3);

    /// Exhaust direction of the continuous engine. Idempotent.
    fn set_thrust_axis(&mut self, body: BodyId, axis: Vector3);

    /// Idempotent.
    fn set_engine_enabled(&mut self, body: BodyId, enabled: bool);

    /// Delta-v delivered so far by a continuous engine, when the actuator tracks it.
    fn delivered_delta_v(&self, _body: BodyId) -> Option<f64> {
        None
    }
}

/// Read-only view of the world state.
pub trait StateSource {
    fn state(&self, body: BodyId) -> Option<StateVector>;

    /// Current simulation time.
    fn physical_time(&self) -> f64;
}
