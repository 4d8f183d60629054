//! Wires a scenario into a world, a controller, and its collaborators, then runs it.

use burnsim_config::ScenarioConfig;
use burnsim_guidance::{BurnReport, CancellationToken, FiniteBurnController, TelemetrySample};
use burnsim_orbits::circular_state;
use burnsim_propulsion::{Thruster, Vehicle};
use log::{debug, info};
use serde::Serialize;

use crate::adapters::{HohmannPlanner, KeplerSnapshot};
use crate::settings;
use crate::world::{TwoBodyWorld, WorldHandle};
use crate::SimError;

/// Everything a finished scenario produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutput {
    pub scenario: String,
    pub report: BurnReport,
    /// Controller ticks executed, warm-up included.
    pub ticks: u64,
    #[serde(skip)]
    pub telemetry: Vec<TelemetrySample>,
}

/// Run one scenario to completion.
///
/// Each iteration ticks the controller and then advances the world one step, so commands
/// issued on a tick act over the step that follows it.
pub fn run_scenario(
    config: &ScenarioConfig,
    cancel: CancellationToken,
) -> Result<RunOutput, SimError> {
    config.validate()?;
    let time_scale = settings::time_scale_from_config(config);
    let burn_settings = settings::from_config(config);
    let mu = config.central_body.mu_km3_s2;
    let step_s = time_scale.sim_to_world_seconds(config.simulation.step_s);

    let mut world = TwoBodyWorld::new(mu, step_s)?.with_time_scale(time_scale);
    let initial = circular_state(config.vehicle.initial_radius_km, mu);

    let mut vehicle = Vehicle::new(config.vehicle.name.clone(), config.vehicle.mass_kg);
    if let Some(engine) = &config.vehicle.engine {
        vehicle = vehicle.with_thruster(Thruster::new(engine.thrust_newtons));
    }
    let primary = world.add_body(vehicle, initial);
    let reference = config.reference.enabled.then(|| {
        world.add_body(
            Vehicle::new(config.reference.name.clone(), config.vehicle.mass_kg),
            initial,
        )
    });

    let handle = WorldHandle::new(world);
    let mut builder = FiniteBurnController::builder(burn_settings, primary)
        .snapshot_provider(KeplerSnapshot::new(mu))
        .planner(HohmannPlanner::new(mu))
        .actuator(handle.clone())
        .state_source(handle.clone())
        .time_scale(time_scale)
        .cancellation(cancel);
    if let Some(body) = reference {
        builder = builder.reference_vehicle(body);
    }
    let mut controller = builder.build()?;

    info!(
        "scenario '{}': {} at {:.1} km around {}, target {:.1} km",
        config.name,
        config.vehicle.name,
        config.vehicle.initial_radius_km,
        config.central_body.name,
        config.burn.target_orbit_radius_km
    );

    controller.start();
    let max_ticks = config.simulation.max_ticks;
    let mut ticks = 0;
    while ticks < max_ticks {
        controller.tick()?;
        ticks += 1;
        if controller.is_done() {
            break;
        }
        handle.step();
    }
    if !controller.is_done() {
        return Err(SimError::TickLimit { max_ticks });
    }
    debug!(
        "scenario '{}' finished after {ticks} ticks, {:.3} s of flight",
        config.name,
        handle.borrow().time()
    );

    let report = controller.report().cloned().ok_or(SimError::MissingReport)?;
    Ok(RunOutput {
        scenario: config.name.clone(),
        report,
        ticks,
        telemetry: controller.take_telemetry(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use burnsim_config::parse_toml;
    use burnsim_guidance::{BurnOutcome, GuidanceError};

    #[test]
    fn target_below_start_converges_without_burning() {
        let config = parse_toml(
            r#"
            [burn]
            steering_mode = "tangent"
            burn_mode = "impulse_train"
            burn_duration_world_s = 60.0
            target_orbit_radius_km = 6000.0
            apogee_tolerance_km = 0.0

            [vehicle]
            initial_radius_km = 7000.0
            "#,
        )
        .unwrap();
        let output = run_scenario(&config, CancellationToken::new()).unwrap();
        // Already above the target: converged on the first burning tick.
        assert_eq!(output.report.outcome, BurnOutcome::Converged);
        assert_eq!(output.report.total_impulse_km_s, 0.0);
        assert_eq!(output.ticks, 2);
    }

    #[test]
    fn pre_cancelled_run_stops_immediately() {
        let config = parse_toml(
            r#"
            [burn]
            steering_mode = "fixed"
            burn_mode = "impulse_train"
            burn_duration_world_s = 60.0
            target_orbit_radius_km = 9000.0

            [vehicle]
            initial_radius_km = 7000.0
            "#,
        )
        .unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let output = run_scenario(&config, token).unwrap();
        assert_eq!(output.report.outcome, BurnOutcome::Cancelled);
        assert_eq!(output.ticks, 1);
        assert_eq!(output.report.ticks_burning, 0);
    }

    #[test]
    fn undefined_steering_surfaces_as_guidance_error() {
        let config = parse_toml(
            r#"
            [burn]
            steering_mode = "perpendicular"
            burn_mode = "continuous_thrust"
            burn_duration_world_s = 600.0
            target_orbit_radius_km = 10000.0
            reference_axis = [1.0, 0.0, 0.0]

            [vehicle]
            initial_radius_km = 7000.0
            engine = { thrust_newtons = 500.0 }
            "#,
        )
        .unwrap();
        let err = run_scenario(&config, CancellationToken::new()).unwrap_err();
        assert!(matches!(
            err,
            SimError::Guidance(GuidanceError::DegenerateSteering { .. })
        ));
    }

    #[test]
    fn tick_limit_is_reported() {
        let config = parse_toml(
            r#"
            [burn]
            steering_mode = "tangent"
            burn_mode = "impulse_train"
            burn_duration_world_s = 600.0
            target_orbit_radius_km = 10000.0

            [simulation]
            max_ticks = 10

            [vehicle]
            initial_radius_km = 7000.0
            "#,
        )
        .unwrap();
        let err = run_scenario(&config, CancellationToken::new()).unwrap_err();
        assert!(matches!(err, SimError::TickLimit { max_ticks: 10 }));
    }
}
