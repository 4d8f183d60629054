//! Finite-burn controller: spreads an impulsive maneuver over many fixed steps.
//!
//! Each tick runs, in order: cancellation check, snapshot refresh, termination check, and
//! only then a steering command. Tick 0 is a warm-up that commands nothing; tick 1 sizes
//! the budget, engages the engine in continuous mode, and fires the reference transfer.

use burnsim_core::StateVector;
use burnsim_core::time::TimeScale;
use burnsim_core::vector::{self, UNIT_Z, Vector3};
use burnsim_orbits::{OrbitSnapshot, wrap_pi};
use log::{debug, info, warn};
use serde::Serialize;

use crate::cancel::CancellationToken;
use crate::collaborators::{
    Actuator, BodyId, ManeuverPlanner, OrbitSnapshotProvider, StateSource, TargetOrbit,
};
use crate::error::GuidanceError;
use crate::plan::BurnPlan;
use crate::reference::ReferenceTransfer;
use crate::report::{BurnReport, TelemetrySample};
use crate::session::{BurnOutcome, BurnPhase, BurnSession};
use crate::steering::{SteeringMode, steering_direction};

/// How the steering direction is turned into actuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BurnMode {
    /// A discrete velocity kick every tick.
    ImpulseTrain,
    /// A persistent engine whose thrust axis is re-aimed every tick.
    ContinuousThrust,
}

/// Configuration-time knobs, fixed for the life of a controller.
#[derive(Debug, Clone, PartialEq)]
pub struct BurnSettings {
    pub steering: SteeringMode,
    pub mode: BurnMode,
    pub burn_duration_world_s: f64,
    pub target_radius_km: f64,
    /// The burn stops once apogee reaches `target_radius_km - apogee_tolerance_km`.
    pub apogee_tolerance_km: f64,
    pub reference_axis: Vector3,
    /// Fixed integration step in simulation time units.
    pub step_sim: f64,
}

impl BurnSettings {
    pub fn new(
        steering: SteeringMode,
        mode: BurnMode,
        burn_duration_world_s: f64,
        target_radius_km: f64,
    ) -> Self {
        Self {
            steering,
            mode,
            burn_duration_world_s,
            target_radius_km,
            apogee_tolerance_km: 1.0,
            reference_axis: UNIT_Z,
            step_sim: 0.1,
        }
    }

    fn validate(&self) -> Result<(), GuidanceError> {
        positive("burn_duration_world_s", self.burn_duration_world_s)?;
        positive("target_radius_km", self.target_radius_km)?;
        positive("step_sim", self.step_sim)?;
        if !(self.apogee_tolerance_km.is_finite() && self.apogee_tolerance_km >= 0.0) {
            return Err(GuidanceError::InvalidSettings {
                field: "apogee_tolerance_km",
                reason: format!("must be >= 0 (got {})", self.apogee_tolerance_km),
            });
        }
        if vector::normalize(&self.reference_axis).is_none() {
            return Err(GuidanceError::InvalidSettings {
                field: "reference_axis",
                reason: format!("must be non-zero (got {:?})", self.reference_axis),
            });
        }
        Ok(())
    }

    /// Apogee at or above which the burn is considered complete.
    pub fn acceptance_radius_km(&self) -> f64 {
        self.target_radius_km - self.apogee_tolerance_km
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), GuidanceError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GuidanceError::InvalidSettings {
            field,
            reason: format!("must be positive (got {value})"),
        })
    }
}

/// Collects collaborators before a controller exists. `build` fails fast on anything missing.
pub struct FiniteBurnControllerBuilder {
    settings: BurnSettings,
    primary: BodyId,
    reference: Option<BodyId>,
    snapshots: Option<Box<dyn OrbitSnapshotProvider>>,
    planner: Option<Box<dyn ManeuverPlanner>>,
    actuator: Option<Box<dyn Actuator>>,
    states: Option<Box<dyn StateSource>>,
    time_scale: TimeScale,
    cancel: CancellationToken,
    record_telemetry: bool,
}

impl FiniteBurnControllerBuilder {
    pub fn snapshot_provider(mut self, provider: impl OrbitSnapshotProvider + 'static) -> Self {
        self.snapshots = Some(Box::new(provider));
        self
    }

    pub fn planner(mut self, planner: impl ManeuverPlanner + 'static) -> Self {
        self.planner = Some(Box::new(planner));
        self
    }

    pub fn actuator(mut self, actuator: impl Actuator + 'static) -> Self {
        self.actuator = Some(Box::new(actuator));
        self
    }

    pub fn state_source(mut self, states: impl StateSource + 'static) -> Self {
        self.states = Some(Box::new(states));
        self
    }

    pub fn time_scale(mut self, time_scale: TimeScale) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Fly the impulsive reference transfer on `body`.
    pub fn reference_vehicle(mut self, body: BodyId) -> Self {
        self.reference = Some(body);
        self
    }

    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn record_telemetry(mut self, enabled: bool) -> Self {
        self.record_telemetry = enabled;
        self
    }

    pub fn build(self) -> Result<FiniteBurnController, GuidanceError> {
        self.settings.validate()?;
        let snapshots = self
            .snapshots
            .ok_or(GuidanceError::MissingCollaborator("orbit snapshot provider"))?;
        let planner = self
            .planner
            .ok_or(GuidanceError::MissingCollaborator("maneuver planner"))?;
        let actuator = self
            .actuator
            .ok_or(GuidanceError::MissingCollaborator("actuator"))?;
        let states = self
            .states
            .ok_or(GuidanceError::MissingCollaborator("state source"))?;

        Ok(FiniteBurnController {
            settings: self.settings,
            primary: self.primary,
            reference_body: self.reference,
            reference: None,
            snapshots,
            planner,
            actuator,
            states,
            time_scale: self.time_scale,
            cancel: self.cancel,
            record_telemetry: self.record_telemetry,
            started: false,
            session: BurnSession::new(),
            plan: None,
            report: None,
            telemetry: Vec::new(),
        })
    }
}

/// Drives one finite burn on the primary vehicle.
pub struct FiniteBurnController {
    settings: BurnSettings,
    primary: BodyId,
    reference_body: Option<BodyId>,
    reference: Option<ReferenceTransfer>,
    snapshots: Box<dyn OrbitSnapshotProvider>,
    planner: Box<dyn ManeuverPlanner>,
    actuator: Box<dyn Actuator>,
    states: Box<dyn StateSource>,
    time_scale: TimeScale,
    cancel: CancellationToken,
    record_telemetry: bool,
    started: bool,
    session: BurnSession,
    plan: Option<BurnPlan>,
    report: Option<BurnReport>,
    telemetry: Vec<TelemetrySample>,
}

impl FiniteBurnController {
    pub fn builder(settings: BurnSettings, primary: BodyId) -> FiniteBurnControllerBuilder {
        FiniteBurnControllerBuilder {
            settings,
            primary,
            reference: None,
            snapshots: None,
            planner: None,
            actuator: None,
            states: None,
            time_scale: TimeScale::identity(),
            cancel: CancellationToken::new(),
            record_telemetry: true,
        }
    }

    /// Begin a fresh session at tick 0. Calling again discards the previous session.
    pub fn start(&mut self) {
        self.session = BurnSession::new();
        self.reference = self.reference_body.map(ReferenceTransfer::new);
        self.plan = None;
        self.report = None;
        self.telemetry.clear();
        self.started = true;
        debug!("finite burn session armed for body {}", self.primary);
    }

    /// Advance the controller by one fixed step and return the phase it ends in.
    pub fn tick(&mut self) -> Result<BurnPhase, GuidanceError> {
        if !self.started {
            return Err(GuidanceError::NotStarted);
        }
        let tick = self.session.tick;
        self.session.tick += 1;

        if self.session.is_done() {
            return Ok(self.session.phase);
        }

        if self.cancel.is_cancelled() {
            warn!("finite burn cancelled at tick {tick}");
            self.finish(BurnOutcome::Cancelled, None)?;
            return Ok(self.session.phase);
        }

        if self.session.phase == BurnPhase::Idle && tick == 0 {
            debug!("warm-up tick, no command issued");
            return Ok(BurnPhase::Idle);
        }

        if let Err(err) = self.advance(tick) {
            self.abort(&err);
            return Err(err);
        }
        Ok(self.session.phase)
    }

    fn advance(&mut self, tick: u64) -> Result<(), GuidanceError> {
        if self.session.phase == BurnPhase::Idle {
            self.initialize()?;
        }
        self.burn_step(tick)
    }

    /// End the session after a failed tick. The engine is cut before anything else that
    /// could fail again.
    fn abort(&mut self, err: &GuidanceError) {
        warn!("finite burn aborted: {err}");
        if let Err(report_err) = self.finish(BurnOutcome::Aborted, None) {
            warn!("no report for aborted burn: {report_err}");
        }
    }

    fn initialize(&mut self) -> Result<(), GuidanceError> {
        let state = self.primary_state()?;
        let target = TargetOrbit {
            radius_km: self.settings.target_radius_km,
        };

        let transfer = self.planner.plan_transfer(&state, &target);
        let duration_world_s = transfer
            .and_then(|t| t.burn_duration_hint_s)
            .filter(|hint| hint.is_finite() && *hint > 0.0)
            .unwrap_or(self.settings.burn_duration_world_s);
        let duration_sim = self.time_scale.world_seconds_to_sim(duration_world_s);

        let plan = match transfer {
            Some(t) if t.delta_v_km_s.is_finite() && t.delta_v_km_s > 0.0 => BurnPlan::new(
                t.delta_v_km_s,
                target.radius_km,
                duration_sim,
                self.settings.step_sim,
            ),
            Some(t) => {
                warn!(
                    "planner returned unusable delta-v {}, burning with an empty budget",
                    t.delta_v_km_s
                );
                BurnPlan::degenerate(target.radius_km, duration_sim, self.settings.step_sim)
            }
            None => {
                info!("planner reports no maneuver required");
                BurnPlan::degenerate(target.radius_km, duration_sim, self.settings.step_sim)
            }
        };

        self.session.initial_direction = vector::normalize(&state.velocity_km_s);
        self.session.start_time = Some(self.states.physical_time());

        if self.settings.mode == BurnMode::ContinuousThrust {
            self.actuator.set_engine_enabled(self.primary, true);
            self.session.engine_engaged = true;
            self.session.commands_issued += 1;
        }

        if let Some(reference) = self.reference.as_mut() {
            reference.fire(
                self.planner.as_ref(),
                self.states.as_ref(),
                self.actuator.as_mut(),
                &target,
            )?;
        }

        info!(
            "finite burn started: dv = {:.6} km/s over {:.1} steps ({:.6} km/s per step), \
             {:?} steering, {:?}",
            plan.total_delta_v_km_s,
            plan.step_count,
            plan.per_step_impulse_km_s,
            self.settings.steering,
            self.settings.mode
        );
        self.plan = Some(plan);
        self.session.phase = BurnPhase::Burning;
        Ok(())
    }

    fn burn_step(&mut self, tick: u64) -> Result<(), GuidanceError> {
        let state = self.primary_state()?;
        let snapshot = self.snapshots.snapshot(&state);
        self.push_sample(tick, &snapshot);

        if let Some(outcome) = self.termination(&snapshot) {
            return self.finish(outcome, Some(snapshot));
        }

        let direction = steering_direction(
            self.settings.steering,
            &state,
            self.session.initial_direction.as_ref(),
            &self.settings.reference_axis,
        )?;

        match self.settings.mode {
            BurnMode::ImpulseTrain => {
                let magnitude = self.per_step_impulse();
                self.actuator
                    .apply_impulse(self.primary, vector::scale(&direction, magnitude));
                self.session.total_impulse_km_s += magnitude;
            }
            BurnMode::ContinuousThrust => {
                // Exhaust points away from the desired acceleration.
                self.actuator
                    .set_thrust_axis(self.primary, vector::neg(&direction));
            }
        }
        self.session.commands_issued += 1;
        self.session.burning_ticks += 1;

        debug!(
            "tick {tick}: apogee {:.3} km, e {:.6}, spent {:.6} km/s",
            snapshot.apogee_radius_km, snapshot.eccentricity, self.session.total_impulse_km_s
        );
        Ok(())
    }

    fn termination(&self, snapshot: &OrbitSnapshot) -> Option<BurnOutcome> {
        if snapshot.eccentricity > 1.0 {
            Some(BurnOutcome::Hyperbolic)
        } else if snapshot.apogee_radius_km >= self.settings.acceptance_radius_km() {
            Some(BurnOutcome::Converged)
        } else if self.plan.map(|p| p.is_degenerate()).unwrap_or(false) {
            Some(BurnOutcome::DegeneratePlan)
        } else {
            None
        }
    }

    fn finish(
        &mut self,
        outcome: BurnOutcome,
        snapshot: Option<OrbitSnapshot>,
    ) -> Result<(), GuidanceError> {
        self.session.phase = BurnPhase::Done(outcome);

        if self.session.engine_engaged {
            self.actuator.set_engine_enabled(self.primary, false);
            self.session.engine_engaged = false;
            self.session.commands_issued += 1;
        }

        let snapshot = match snapshot {
            Some(snapshot) => snapshot,
            None => self.snapshots.snapshot(&self.primary_state()?),
        };

        let now = self.states.physical_time();
        let elapsed_sim = self.session.start_time.map(|t0| now - t0).unwrap_or(0.0);
        let elapsed_world_s = self.time_scale.sim_to_world_seconds(elapsed_sim);

        let delivered = match self.settings.mode {
            BurnMode::ContinuousThrust => self.actuator.delivered_delta_v(self.primary),
            BurnMode::ImpulseTrain => None,
        };
        let total_delta_v = self.session.total_impulse_km_s + delivered.unwrap_or(0.0);

        let reference_burn = self.reference.as_ref().and_then(|r| r.burn());
        let reference_phase = match reference_burn {
            Some(burn) => {
                let state = self
                    .states
                    .state(burn.body)
                    .ok_or(GuidanceError::UnknownBody(burn.body))?;
                Some(self.snapshots.snapshot(&state).phase_angle_rad)
            }
            None => None,
        };
        let phase_offset = reference_phase.map(|r| wrap_pi(snapshot.phase_angle_rad - r));

        let plan = self.plan.unwrap_or_else(|| {
            BurnPlan::degenerate(
                self.settings.target_radius_km,
                self.time_scale
                    .world_seconds_to_sim(self.settings.burn_duration_world_s),
                self.settings.step_sim,
            )
        });

        let report = BurnReport {
            outcome,
            steering_mode: self.settings.steering,
            burn_mode: self.settings.mode,
            target_radius_km: self.settings.target_radius_km,
            ticks_burning: self.session.burning_ticks,
            elapsed_sim_time: elapsed_sim,
            elapsed_world_s,
            total_impulse_km_s: self.session.total_impulse_km_s,
            total_delta_v_km_s: total_delta_v,
            planned_delta_v_km_s: plan.total_delta_v_km_s,
            per_step_impulse_km_s: plan.per_step_impulse_km_s,
            final_snapshot: snapshot,
            phase_angle_rad: snapshot.phase_angle_rad,
            reference_phase_angle_rad: reference_phase,
            phase_offset_rad: phase_offset,
            reference_delta_v_km_s: reference_burn.map(|b| b.delta_v_km_s),
        };

        match outcome {
            BurnOutcome::Converged => info!(
                "burn converged after {:.3} sim ({:.3} s world): dv spent {:.6} km/s, \
                 apogee {:.3} km, phase {:.6} rad",
                elapsed_sim,
                elapsed_world_s,
                total_delta_v,
                snapshot.apogee_radius_km,
                snapshot.phase_angle_rad
            ),
            BurnOutcome::Hyperbolic => warn!(
                "burn FAILED: orbit went hyperbolic (e = {:.6}) after {:.3} sim \
                 ({:.3} s world), dv spent {:.6} km/s",
                snapshot.eccentricity, elapsed_sim, elapsed_world_s, total_delta_v
            ),
            BurnOutcome::DegeneratePlan => warn!(
                "burn ended with an empty budget: apogee {:.3} km short of {:.3} km",
                snapshot.apogee_radius_km,
                self.settings.acceptance_radius_km()
            ),
            BurnOutcome::Cancelled => warn!(
                "burn cancelled after {:.3} sim ({:.3} s world), dv spent {:.6} km/s",
                elapsed_sim, elapsed_world_s, total_delta_v
            ),
            BurnOutcome::Aborted => warn!(
                "burn aborted after {:.3} sim ({:.3} s world), dv spent {:.6} km/s",
                elapsed_sim, elapsed_world_s, total_delta_v
            ),
        }
        if let Some(offset) = phase_offset {
            info!("phase offset versus impulsive reference: {offset:.6} rad");
        }

        self.report = Some(report);
        Ok(())
    }

    fn primary_state(&self) -> Result<StateVector, GuidanceError> {
        self.states
            .state(self.primary)
            .ok_or(GuidanceError::UnknownBody(self.primary))
    }

    fn per_step_impulse(&self) -> f64 {
        self.plan.map(|p| p.per_step_impulse_km_s).unwrap_or(0.0)
    }

    fn push_sample(&mut self, tick: u64, snapshot: &OrbitSnapshot) {
        if !self.record_telemetry {
            return;
        }
        self.telemetry.push(TelemetrySample {
            tick,
            sim_time: self.states.physical_time(),
            apogee_radius_km: snapshot.apogee_radius_km,
            eccentricity: snapshot.eccentricity,
            phase_angle_rad: snapshot.phase_angle_rad,
            total_impulse_km_s: self.session.total_impulse_km_s,
        });
    }

    pub fn settings(&self) -> &BurnSettings {
        &self.settings
    }

    pub fn session(&self) -> &BurnSession {
        &self.session
    }

    pub fn phase(&self) -> BurnPhase {
        self.session.phase
    }

    pub fn is_done(&self) -> bool {
        self.session.is_done()
    }

    pub fn plan(&self) -> Option<&BurnPlan> {
        self.plan.as_ref()
    }

    pub fn report(&self) -> Option<&BurnReport> {
        self.report.as_ref()
    }

    pub fn reference(&self) -> Option<&ReferenceTransfer> {
        self.reference.as_ref()
    }

    pub fn telemetry(&self) -> &[TelemetrySample] {
        &self.telemetry
    }

    /// Hand the recorded samples to the caller, leaving the buffer empty.
    pub fn take_telemetry(&mut self) -> Vec<TelemetrySample> {
        std::mem::take(&mut self.telemetry)
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}
