//! Mutable state of one guidance run.

use burnsim_core::vector::Vector3;
use serde::Serialize;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BurnOutcome {
    /// Apogee reached the target within tolerance.
    Converged,
    /// Eccentricity exceeded 1: the vehicle is escaping.
    Hyperbolic,
    /// Nothing to spend and the target is not reached.
    DegeneratePlan,
    /// Cancellation token tripped.
    Cancelled,
    /// A tick failed (unknown body, undefined steering); the engine was cut.
    Aborted,
}

impl BurnOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BurnOutcome::Converged)
    }
}

/// Controller lifecycle. `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BurnPhase {
    /// Waiting out the warm-up tick.
    Idle,
    Burning,
    Done(BurnOutcome),
}

/// Owned exclusively by the controller; a new run gets a new session.
#[derive(Debug, Clone, PartialEq)]
pub struct BurnSession {
    pub(crate) phase: BurnPhase,
    pub(crate) tick: u64,
    pub(crate) burning_ticks: u64,
    pub(crate) commands_issued: u64,
    pub(crate) total_impulse_km_s: f64,
    pub(crate) start_time: Option<f64>,
    pub(crate) initial_direction: Option<Vector3>,
    pub(crate) engine_engaged: bool,
}

impl BurnSession {
    pub fn new() -> Self {
        Self {
            phase: BurnPhase::Idle,
            tick: 0,
            burning_ticks: 0,
            commands_issued: 0,
            total_impulse_km_s: 0.0,
            start_time: None,
            initial_direction: None,
            engine_engaged: false,
        }
    }

    pub fn phase(&self) -> BurnPhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        matches!(self.phase, BurnPhase::Done(_))
    }

    /// Ticks seen so far, warm-up included.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Ticks that issued a steering command.
    pub fn burning_ticks(&self) -> u64 {
        self.burning_ticks
    }

    /// Impulse, thrust-axis, and engine commands sent to the actuator.
    pub fn commands_issued(&self) -> u64 {
        self.commands_issued
    }

    /// Sum of impulse-train magnitudes applied.
    pub fn total_impulse_km_s(&self) -> f64 {
        self.total_impulse_km_s
    }

    pub fn start_time(&self) -> Option<f64> {
        self.start_time
    }

    pub fn initial_direction(&self) -> Option<Vector3> {
        self.initial_direction
    }
}

impl Default for BurnSession {
    fn default() -> Self {
        Self::new()
    }
}
