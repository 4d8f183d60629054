use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use finite_burn_sim::config::{
    BurnModeConfig, ScenarioConfig, SteeringModeConfig, load_scenarios,
};
use finite_burn_sim::export::{report, telemetry, writer_for_path};
use finite_burn_sim::guidance::CancellationToken;
use finite_burn_sim::sim::{RunOutput, run_scenario};
use log::{info, warn};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Fly finite apogee-raise burns and compare them with an impulsive Hohmann reference"
)]
struct Cli {
    /// Scenario file (TOML/YAML) or directory of scenario files
    #[arg(long, default_value = "configs/scenarios")]
    config: PathBuf,

    /// Override the steering law for every scenario
    #[arg(long, value_enum)]
    steering: Option<Steering>,

    /// Override the burn mode for every scenario
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Override the target orbit radius (km)
    #[arg(long)]
    target_km: Option<f64>,

    /// Override the burn duration (world seconds)
    #[arg(long)]
    duration_s: Option<f64>,

    /// Directory receiving `<scenario>.json` reports and `<scenario>_telemetry.csv`
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print JSON reports to stdout instead of the text summary
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum Steering {
    Fixed,
    Perpendicular,
    Tangent,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum Mode {
    ImpulseTrain,
    ContinuousThrust,
}

fn main() -> anyhow::Result<ExitCode> {
    if env::var("RUST_LOG").is_err() {
        unsafe { env::set_var("RUST_LOG", "info") }
    }
    pretty_env_logger::init();

    let cli = Cli::parse();
    let mut scenarios = load_scenarios(&cli.config)
        .with_context(|| format!("loading scenarios from {}", cli.config.display()))?;
    for scenario in &mut scenarios {
        apply_overrides(&cli, scenario);
    }

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        warn!("interrupt received, stopping after the current tick");
        handler_token.cancel();
    })?;

    let mut failures = 0usize;
    for scenario in &scenarios {
        if cancel.is_cancelled() {
            break;
        }
        let output = run_scenario(scenario, cancel.clone())
            .with_context(|| format!("running scenario '{}'", scenario.name))?;
        emit(&cli, &output)?;
        if !output.report.is_success() {
            failures += 1;
        }
    }

    if failures > 0 {
        warn!("{failures} of {} scenario(s) did not converge", scenarios.len());
        return Ok(ExitCode::from(2));
    }
    info!("{} scenario(s) converged", scenarios.len());
    Ok(ExitCode::SUCCESS)
}

fn apply_overrides(cli: &Cli, scenario: &mut ScenarioConfig) {
    if let Some(steering) = cli.steering {
        scenario.burn.steering_mode = match steering {
            Steering::Fixed => SteeringModeConfig::Fixed,
            Steering::Perpendicular => SteeringModeConfig::Perpendicular,
            Steering::Tangent => SteeringModeConfig::Tangent,
        };
    }
    if let Some(mode) = cli.mode {
        scenario.burn.burn_mode = match mode {
            Mode::ImpulseTrain => BurnModeConfig::ImpulseTrain,
            Mode::ContinuousThrust => BurnModeConfig::ContinuousThrust,
        };
    }
    if let Some(target) = cli.target_km {
        scenario.burn.target_orbit_radius_km = target;
    }
    if let Some(duration) = cli.duration_s {
        scenario.burn.burn_duration_world_s = duration;
    }
}

fn emit(cli: &Cli, output: &RunOutput) -> anyhow::Result<()> {
    if cli.json {
        let mut stdout = writer_for_path(Path::new("-"))?;
        report::write_json(&mut *stdout, &output.scenario, &output.report)?;
    } else {
        println!("{}", report::summary(&output.scenario, &output.report));
        println!();
    }

    if let Some(dir) = &cli.output_dir {
        let stem = file_stem(&output.scenario);
        if stem.is_empty() {
            bail!("scenario name '{}' cannot be used as a file name", output.scenario);
        }
        let report_path = dir.join(format!("{stem}.json"));
        let mut writer = writer_for_path(&report_path)?;
        report::write_json(&mut *writer, &output.scenario, &output.report)?;

        let telemetry_path = dir.join(format!("{stem}_telemetry.csv"));
        let mut writer = writer_for_path(&telemetry_path)?;
        telemetry::write_all(&mut *writer, &output.telemetry)?;
        info!(
            "wrote {} and {}",
            report_path.display(),
            telemetry_path.display()
        );
    }
    Ok(())
}

fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
