//! Finite-burn apogee-raise guidance compared against an impulsive Hohmann reference.
//!
//! The workspace crates are re-exported here so front-ends and integration tests share
//! one dependency.

pub use burnsim_config as config;
pub use burnsim_core as base;
pub use burnsim_export as export;
pub use burnsim_guidance as guidance;
pub use burnsim_impulsive as impulsive;
pub use burnsim_orbits as orbits;
pub use burnsim_propulsion as propulsion;
pub use burnsim_sim as sim;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
