//! Analytic estimators for impulsive transfers in the two-body limit.
//!
//! Provides the classical Hohmann calculator and the single-burn apoapsis raise used to size
//! a finite burn: both return delta-v and time of flight for Keplerian motion about a
//! specified central GM.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TransferError {
    #[error("{name} must be positive and finite (got {value})")]
    NonPositive { name: &'static str, value: f64 },
}

fn positive(name: &'static str, value: f64) -> Result<f64, TransferError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(TransferError::NonPositive { name, value })
    }
}

/// Result for a Hohmann transfer between circular, coplanar orbits of radii r1 and r2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HohmannResult {
    pub dv1_km_s: f64,      // signed: negative for inward (retro) burn
    pub dv2_km_s: f64,      // signed: negative for retro capture when arriving inward
    pub dv_total_km_s: f64, // |dv1| + |dv2|
    pub tof_seconds: f64,
}

/// Compute the classical Hohmann transfer between two circular coplanar orbits.
///
/// Inputs:
/// - `r1_km`: initial circular orbit radius (km)
/// - `r2_km`: target circular orbit radius (km)
/// - `mu_km3_s2`: gravitational parameter of central body (km^3/s^2)
pub fn hohmann(r1_km: f64, r2_km: f64, mu_km3_s2: f64) -> Result<HohmannResult, TransferError> {
    let r1_km = positive("r1_km", r1_km)?;
    let r2_km = positive("r2_km", r2_km)?;
    let mu_km3_s2 = positive("mu_km3_s2", mu_km3_s2)?;

    let v1 = (mu_km3_s2 / r1_km).sqrt();
    let v2 = (mu_km3_s2 / r2_km).sqrt();
    let a_t = 0.5 * (r1_km + r2_km);
    let tof = std::f64::consts::PI * (a_t.powi(3) / mu_km3_s2).sqrt();

    // Transfer periapsis speed (at r1) and apoapsis speed (at r2)
    let v_t1 = (mu_km3_s2 * (2.0 / r1_km - 1.0 / a_t)).sqrt();
    let v_t2 = (mu_km3_s2 * (2.0 / r2_km - 1.0 / a_t)).sqrt();

    let dv1 = v_t1 - v1;
    let dv2 = v2 - v_t2;

    Ok(HohmannResult {
        dv1_km_s: dv1,
        dv2_km_s: dv2,
        dv_total_km_s: dv1.abs() + dv2.abs(),
        tof_seconds: tof,
    })
}

/// First burn of a Hohmann-style transfer started from the current point of an arbitrary orbit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApoapsisRaise {
    /// Signed: negative when the target lies inside the current radius.
    pub dv_km_s: f64,
    /// Speed required at the burn point to place apoapsis at the target.
    pub required_speed_km_s: f64,
    /// Half-period of the transfer ellipse.
    pub tof_seconds: f64,
}

/// Delta-v to turn the current point into the periapsis of an ellipse reaching `target_km`.
///
/// The burn is modelled as horizontal at radius `r_km` with current speed `speed_km_s`;
/// the vis-viva equation gives the speed needed on the transfer ellipse.
pub fn apoapsis_raise(
    r_km: f64,
    speed_km_s: f64,
    target_km: f64,
    mu_km3_s2: f64,
) -> Result<ApoapsisRaise, TransferError> {
    let r_km = positive("r_km", r_km)?;
    let target_km = positive("target_km", target_km)?;
    let mu_km3_s2 = positive("mu_km3_s2", mu_km3_s2)?;
    if !speed_km_s.is_finite() || speed_km_s < 0.0 {
        return Err(TransferError::NonPositive {
            name: "speed_km_s",
            value: speed_km_s,
        });
    }

    let a_t = 0.5 * (r_km + target_km);
    let required = (mu_km3_s2 * (2.0 / r_km - 1.0 / a_t)).sqrt();
    let tof = std::f64::consts::PI * (a_t.powi(3) / mu_km3_s2).sqrt();

    Ok(ApoapsisRaise {
        dv_km_s: required - speed_km_s,
        required_speed_km_s: required,
        tof_seconds: tof,
    })
}
