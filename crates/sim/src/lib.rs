//! Two-body simulation harness for the finite-burn controller.
//!
//! [`world`] integrates point-mass dynamics, [`adapters`] supplies the Keplerian snapshot
//! and Hohmann planner collaborators, and [`runner`] wires a scenario end to end.

use burnsim_config::ConfigError;
use burnsim_guidance::GuidanceError;
use thiserror::Error;

pub mod adapters;
pub mod runner;
pub mod settings;
pub mod world;

pub use adapters::{HohmannPlanner, KeplerSnapshot};
pub use runner::{RunOutput, run_scenario};
pub use world::{Body, TwoBodyWorld, WorldHandle};

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid scenario: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Guidance(#[from] GuidanceError),
    #[error("invalid world: {0}")]
    InvalidWorld(String),
    #[error("burn did not finish within {max_ticks} ticks")]
    TickLimit { max_ticks: u64 },
    #[error("controller finished without producing a report")]
    MissingReport,
}
