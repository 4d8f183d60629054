//! Steering laws for the finite burn.

use burnsim_core::StateVector;
use burnsim_core::vector::{self, Vector3};
use serde::Serialize;

use crate::error::GuidanceError;

/// Direction the per-step correction is applied along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SteeringMode {
    /// The velocity direction captured when the burn started.
    Fixed,
    /// In-plane normal to the radius vector: `reference_axis × r̂`.
    Perpendicular,
    /// Along the current velocity.
    Tangent,
}

/// Unit steering vector for the current state.
///
/// `fixed` is the direction captured at session start; it is only read in `Fixed` mode.
pub fn steering_direction(
    mode: SteeringMode,
    state: &StateVector,
    fixed: Option<&Vector3>,
    reference_axis: &Vector3,
) -> Result<Vector3, GuidanceError> {
    let direction = match mode {
        SteeringMode::Tangent => vector::normalize(&state.velocity_km_s),
        SteeringMode::Perpendicular => vector::normalize(&state.position_km)
            .and_then(|r_hat| vector::normalize(&vector::cross(reference_axis, &r_hat))),
        SteeringMode::Fixed => fixed.copied().and_then(|d| vector::normalize(&d)),
    };
    direction.ok_or(GuidanceError::DegenerateSteering { mode })
}
