//! Configuration models and loaders for finite-burn scenarios.

use std::fs::File;
use std::path::{Path, PathBuf};

use burnsim_core::constants::MU_EARTH_KM3_S2;
use burnsim_core::vector::{self, UNIT_Z, Vector3};
use serde::Deserialize;
use thiserror::Error;

/// Default apogee acceptance tolerance (km).
pub const DEFAULT_APOGEE_TOLERANCE_KM: f64 = 1.0;
/// Default fixed integration step (simulation time units).
pub const DEFAULT_STEP_S: f64 = 0.1;
/// Default hard stop for runaway scenarios.
pub const DEFAULT_MAX_TICKS: u64 = 2_000_000;

/// One guidance experiment: a vehicle, a target radius, and how to burn towards it.
#[derive(Debug, Deserialize, Clone)]
pub struct ScenarioConfig {
    #[serde(default = "default_scenario_name")]
    pub name: String,
    pub burn: BurnConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub central_body: CentralBodyConfig,
    pub vehicle: VehicleConfig,
    #[serde(default)]
    pub reference: ReferenceConfig,
}

/// Steering law selection.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SteeringModeConfig {
    Fixed,
    Perpendicular,
    Tangent,
}

/// Burn actuation selection.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BurnModeConfig {
    ImpulseTrain,
    ContinuousThrust,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BurnConfig {
    pub steering_mode: SteeringModeConfig,
    pub burn_mode: BurnModeConfig,
    pub burn_duration_world_s: f64,
    pub target_orbit_radius_km: f64,
    #[serde(default = "default_tolerance")]
    pub apogee_tolerance_km: f64,
    /// Out-of-plane axis used by the perpendicular steering law.
    #[serde(default = "default_reference_axis")]
    pub reference_axis: Vector3,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulationConfig {
    #[serde(default = "default_step")]
    pub step_s: f64,
    #[serde(default = "default_time_scale")]
    pub world_seconds_per_sim_second: f64,
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            step_s: DEFAULT_STEP_S,
            world_seconds_per_sim_second: default_time_scale(),
            max_ticks: DEFAULT_MAX_TICKS,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CentralBodyConfig {
    #[serde(default = "default_body_name")]
    pub name: String,
    #[serde(default = "default_mu")]
    pub mu_km3_s2: f64,
}

impl Default for CentralBodyConfig {
    fn default() -> Self {
        Self {
            name: default_body_name(),
            mu_km3_s2: MU_EARTH_KM3_S2,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct VehicleConfig {
    #[serde(default = "default_vehicle_name")]
    pub name: String,
    /// Radius of the initial circular orbit.
    pub initial_radius_km: f64,
    #[serde(default = "default_mass")]
    pub mass_kg: f64,
    #[serde(default)]
    pub engine: Option<EngineConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    pub thrust_newtons: f64,
}

/// The impulsive control vehicle flown alongside the finite burn.
#[derive(Debug, Deserialize, Clone)]
pub struct ReferenceConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_reference_name")]
    pub name: String,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name: default_reference_name(),
        }
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("no scenario files found in {0}")]
    Empty(PathBuf),
}

impl ScenarioConfig {
    /// Reject configurations the guidance loop cannot run safely.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let burn = &self.burn;
        require_positive("burn.burn_duration_world_s", burn.burn_duration_world_s)?;
        require_positive("burn.target_orbit_radius_km", burn.target_orbit_radius_km)?;
        if !(burn.apogee_tolerance_km.is_finite() && burn.apogee_tolerance_km >= 0.0) {
            return Err(invalid(
                "burn.apogee_tolerance_km",
                format!("must be >= 0 (got {})", burn.apogee_tolerance_km),
            ));
        }
        if vector::normalize(&burn.reference_axis).is_none() {
            return Err(invalid(
                "burn.reference_axis",
                format!("must be a non-zero vector (got {:?})", burn.reference_axis),
            ));
        }

        require_positive("simulation.step_s", self.simulation.step_s)?;
        require_positive(
            "simulation.world_seconds_per_sim_second",
            self.simulation.world_seconds_per_sim_second,
        )?;
        if self.simulation.max_ticks == 0 {
            return Err(invalid("simulation.max_ticks", "must be at least 1".into()));
        }

        require_positive("central_body.mu_km3_s2", self.central_body.mu_km3_s2)?;
        require_positive("vehicle.initial_radius_km", self.vehicle.initial_radius_km)?;
        require_positive("vehicle.mass_kg", self.vehicle.mass_kg)?;

        match (&self.burn.burn_mode, &self.vehicle.engine) {
            (BurnModeConfig::ContinuousThrust, None) => Err(invalid(
                "vehicle.engine",
                "continuous_thrust requires an engine".into(),
            )),
            (_, Some(engine)) => {
                require_positive("vehicle.engine.thrust_newtons", engine.thrust_newtons)
            }
            (BurnModeConfig::ImpulseTrain, None) => Ok(()),
        }
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive (got {value})")))
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

/// Load and validate a single scenario from a TOML or YAML file.
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<ScenarioConfig, ConfigError> {
    let scenario: ScenarioConfig = read_record(path.as_ref())?;
    scenario.validate()?;
    Ok(scenario)
}

/// Load every scenario under `path`: a single file, or all `.toml`/`.yaml` files of a directory
/// in name order.
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<ScenarioConfig>, ConfigError> {
    let path = path.as_ref();
    let scenarios: Vec<ScenarioConfig> = if path.is_dir() {
        read_dir_records(path)?
    } else {
        vec![read_record(path)?]
    };
    if scenarios.is_empty() {
        return Err(ConfigError::Empty(path.to_path_buf()));
    }
    for scenario in &scenarios {
        scenario.validate()?;
    }
    Ok(scenarios)
}

/// Parse a scenario from a TOML string.
pub fn parse_toml(contents: &str) -> Result<ScenarioConfig, ConfigError> {
    let scenario: ScenarioConfig = toml::from_str(contents)?;
    scenario.validate()?;
    Ok(scenario)
}

fn read_record<T>(path: &Path) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    if has_extension(path, "toml") {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            has_extension(path, "toml") || has_extension(path, "yaml") || has_extension(path, "yml")
        })
        .collect();
    entries.sort();
    entries.iter().map(|path| read_record(path)).collect()
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().map(|e| e == ext).unwrap_or(false)
}

fn default_scenario_name() -> String {
    "apogee-raise".to_string()
}

fn default_tolerance() -> f64 {
    DEFAULT_APOGEE_TOLERANCE_KM
}

fn default_reference_axis() -> Vector3 {
    UNIT_Z
}

fn default_step() -> f64 {
    DEFAULT_STEP_S
}

fn default_time_scale() -> f64 {
    1.0
}

fn default_max_ticks() -> u64 {
    DEFAULT_MAX_TICKS
}

fn default_body_name() -> String {
    "EARTH".to_string()
}

fn default_mu() -> f64 {
    MU_EARTH_KM3_S2
}

fn default_vehicle_name() -> String {
    "primary".to_string()
}

fn default_mass() -> f64 {
    1_000.0
}

fn default_true() -> bool {
    true
}

fn default_reference_name() -> String {
    "control".to_string()
}
