//! End-of-session report and per-tick telemetry.

use burnsim_orbits::OrbitSnapshot;
use serde::Serialize;

use crate::controller::BurnMode;
use crate::session::BurnOutcome;
use crate::steering::SteeringMode;

/// One row of burn telemetry, recorded every burning tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TelemetrySample {
    pub tick: u64,
    pub sim_time: f64,
    pub apogee_radius_km: f64,
    pub eccentricity: f64,
    pub phase_angle_rad: f64,
    pub total_impulse_km_s: f64,
}

/// Performance summary produced when a session enters `Done`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BurnReport {
    pub outcome: BurnOutcome,
    pub steering_mode: SteeringMode,
    pub burn_mode: BurnMode,
    pub target_radius_km: f64,
    pub ticks_burning: u64,
    pub elapsed_sim_time: f64,
    pub elapsed_world_s: f64,
    /// Impulse-train magnitude actually applied.
    pub total_impulse_km_s: f64,
    /// Impulses plus whatever a continuous engine reports delivering.
    pub total_delta_v_km_s: f64,
    pub planned_delta_v_km_s: f64,
    pub per_step_impulse_km_s: f64,
    pub final_snapshot: OrbitSnapshot,
    pub phase_angle_rad: f64,
    pub reference_phase_angle_rad: Option<f64>,
    /// `phase_angle_rad - reference_phase_angle_rad`, wrapped to `(-π, π]`.
    pub phase_offset_rad: Option<f64>,
    pub reference_delta_v_km_s: Option<f64>,
}

impl BurnReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    pub fn is_hyperbolic(&self) -> bool {
        self.outcome == BurnOutcome::Hyperbolic
    }

    /// Spend above (positive) or below the idealized impulsive budget.
    pub fn delta_v_overhead_km_s(&self) -> f64 {
        self.total_delta_v_km_s - self.planned_delta_v_km_s
    }
}
