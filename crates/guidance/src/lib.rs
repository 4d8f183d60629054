//! Finite-burn guidance: turns an idealized impulsive maneuver into a train of small
//! steered corrections, detects convergence onto the target apogee, and reports the cost
//! against an impulsive reference vehicle.

pub mod cancel;
pub mod collaborators;
pub mod controller;
pub mod error;
pub mod plan;
pub mod reference;
pub mod report;
pub mod session;
pub mod steering;

pub use facade::*;

mod facade;
