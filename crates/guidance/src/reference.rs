//! One-shot impulsive transfer flown by the control vehicle.

use burnsim_core::vector;
use log::{info, warn};
use serde::Serialize;

use crate::collaborators::{Actuator, BodyId, ManeuverPlanner, StateSource, TargetOrbit};
use crate::error::GuidanceError;

/// What the reference vehicle was given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceBurn {
    pub body: BodyId,
    pub delta_v_km_s: f64,
    pub fired_at: f64,
}

/// Applies the planner's full maneuver to a secondary body exactly once.
#[derive(Debug, Clone)]
pub struct ReferenceTransfer {
    body: BodyId,
    fired: bool,
    burn: Option<ReferenceBurn>,
}

impl ReferenceTransfer {
    pub fn new(body: BodyId) -> Self {
        Self {
            body,
            fired: false,
            burn: None,
        }
    }

    pub fn body(&self) -> BodyId {
        self.body
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// The impulse that was applied, if any.
    pub fn burn(&self) -> Option<ReferenceBurn> {
        self.burn
    }

    /// Plan and apply the transfer. Every call after the first is a no-op returning `None`.
    pub fn fire(
        &mut self,
        planner: &dyn ManeuverPlanner,
        states: &dyn StateSource,
        actuator: &mut dyn Actuator,
        target: &TargetOrbit,
    ) -> Result<Option<ReferenceBurn>, GuidanceError> {
        if self.fired {
            return Ok(None);
        }
        self.fired = true;

        let state = states
            .state(self.body)
            .ok_or(GuidanceError::UnknownBody(self.body))?;
        let Some(transfer) = planner.plan_transfer(&state, target) else {
            info!("reference vehicle {}: no maneuver required", self.body);
            return Ok(None);
        };
        if !vector::is_finite(&transfer.burn_vector) || !transfer.delta_v_km_s.is_finite() {
            warn!(
                "reference vehicle {}: planner returned a non-finite burn, skipping",
                self.body
            );
            return Ok(None);
        }

        actuator.apply_impulse(self.body, transfer.burn_vector);
        let burn = ReferenceBurn {
            body: self.body,
            delta_v_km_s: vector::norm(&transfer.burn_vector),
            fired_at: states.physical_time(),
        };
        info!(
            "reference vehicle {}: impulsive burn of {:.6} km/s applied",
            self.body, burn.delta_v_km_s
        );
        self.burn = Some(burn);
        Ok(Some(burn))
    }
}
