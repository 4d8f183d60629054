//! Maps scenario sections onto controller settings.

use burnsim_config::{BurnModeConfig, ScenarioConfig, SteeringModeConfig};
use burnsim_core::time::TimeScale;
use burnsim_guidance::{BurnMode, BurnSettings, SteeringMode};

pub fn steering_from_config(config: SteeringModeConfig) -> SteeringMode {
    match config {
        SteeringModeConfig::Fixed => SteeringMode::Fixed,
        SteeringModeConfig::Perpendicular => SteeringMode::Perpendicular,
        SteeringModeConfig::Tangent => SteeringMode::Tangent,
    }
}

pub fn mode_from_config(config: BurnModeConfig) -> BurnMode {
    match config {
        BurnModeConfig::ImpulseTrain => BurnMode::ImpulseTrain,
        BurnModeConfig::ContinuousThrust => BurnMode::ContinuousThrust,
    }
}

/// Convert a scenario's burn and simulation sections into controller settings.
pub fn from_config(config: &ScenarioConfig) -> BurnSettings {
    BurnSettings {
        steering: steering_from_config(config.burn.steering_mode),
        mode: mode_from_config(config.burn.burn_mode),
        burn_duration_world_s: config.burn.burn_duration_world_s,
        target_radius_km: config.burn.target_orbit_radius_km,
        apogee_tolerance_km: config.burn.apogee_tolerance_km,
        reference_axis: config.burn.reference_axis,
        step_sim: config.simulation.step_s,
    }
}

pub fn time_scale_from_config(config: &ScenarioConfig) -> TimeScale {
    TimeScale::new(config.simulation.world_seconds_per_sim_second)
}
