//! Impulsive transfer utilities: classical Hohmann estimates and single-burn apoapsis raises.

pub mod transfers;

pub use transfers::{ApoapsisRaise, HohmannResult, TransferError, apoapsis_raise, hohmann};
