//! Thruster and vehicle mass properties.
//!
//! Mass is held constant for the whole burn; the thruster only turns a commanded axis and
//! an on/off flag into an acceleration.

use burnsim_core::units::force_to_accel_km_s2;
use burnsim_core::vector::{self, Vector3};
use log::debug;

/// Continuous thruster. The axis is the exhaust direction: the vehicle accelerates along
/// `-axis`.
#[derive(Debug, Clone)]
pub struct Thruster {
    pub thrust_newtons: f64,
    axis: Vector3,
    enabled: bool,
    delivered_delta_v_km_s: f64,
}

impl Thruster {
    pub fn new(thrust_newtons: f64) -> Self {
        Self {
            thrust_newtons,
            axis: vector::ZERO,
            enabled: false,
            delivered_delta_v_km_s: 0.0,
        }
    }

    /// Point the exhaust. Non-finite or zero-length axes are ignored.
    pub fn set_axis(&mut self, axis: Vector3) {
        match vector::normalize(&axis) {
            Some(unit) => self.axis = unit,
            None => debug!("ignoring degenerate thrust axis {axis:?}"),
        }
    }

    pub fn axis(&self) -> Vector3 {
        self.axis
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            debug!("thruster {}", if enabled { "engaged" } else { "disengaged" });
        }
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Acceleration (km/s²) imparted on a vehicle of `mass_kg`, zero while disabled or unaimed.
    pub fn acceleration_km_s2(&self, mass_kg: f64) -> Vector3 {
        if !self.enabled || mass_kg <= 0.0 || self.axis == vector::ZERO {
            return vector::ZERO;
        }
        let magnitude = force_to_accel_km_s2(self.thrust_newtons, mass_kg);
        vector::scale(&self.axis, -magnitude)
    }

    /// Account for one integration step of thrusting.
    pub fn record_step(&mut self, mass_kg: f64, dt_s: f64) {
        let accel = vector::norm(&self.acceleration_km_s2(mass_kg));
        self.delivered_delta_v_km_s += accel * dt_s;
    }

    /// Total delta-v delivered since construction (km/s).
    pub fn delivered_delta_v_km_s(&self) -> f64 {
        self.delivered_delta_v_km_s
    }
}

/// Spacecraft definition used by the simulation world.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub name: String,
    pub mass_kg: f64,
    pub thruster: Option<Thruster>,
}

impl Vehicle {
    pub fn new(name: impl Into<String>, mass_kg: f64) -> Self {
        Self {
            name: name.into(),
            mass_kg,
            thruster: None,
        }
    }

    pub fn with_thruster(mut self, thruster: Thruster) -> Self {
        self.thruster = Some(thruster);
        self
    }

    /// Thrust acceleration for the current step (km/s²).
    pub fn thrust_acceleration_km_s2(&self) -> Vector3 {
        self.thruster
            .as_ref()
            .map(|t| t.acceleration_km_s2(self.mass_kg))
            .unwrap_or(vector::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn thrust_points_opposite_exhaust_axis() {
        let mut thruster = Thruster::new(1_000.0);
        thruster.set_axis([0.0, -2.0, 0.0]);
        thruster.set_enabled(true);
        let accel = thruster.acceleration_km_s2(1_000.0);
        // 1000 N on 1000 kg = 1 m/s² = 1e-3 km/s² along +Y
        assert_relative_eq!(accel[1], 1.0e-3, epsilon = 1e-15);
        assert_eq!(accel[0], 0.0);
    }

    #[test]
    fn disabled_thruster_is_inert_and_records_nothing() {
        let mut thruster = Thruster::new(500.0);
        thruster.set_axis([1.0, 0.0, 0.0]);
        assert_eq!(thruster.acceleration_km_s2(100.0), vector::ZERO);
        thruster.record_step(100.0, 10.0);
        assert_eq!(thruster.delivered_delta_v_km_s(), 0.0);

        thruster.set_enabled(true);
        thruster.record_step(100.0, 10.0);
        assert_relative_eq!(thruster.delivered_delta_v_km_s(), 0.05, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_axis_keeps_previous_direction() {
        let mut thruster = Thruster::new(1.0);
        thruster.set_axis([0.0, 0.0, 3.0]);
        thruster.set_axis([f64::NAN, 0.0, 0.0]);
        assert_eq!(thruster.axis(), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn vehicle_without_thruster_has_no_acceleration() {
        let vehicle = Vehicle::new("probe", 500.0);
        assert_eq!(vehicle.thrust_acceleration_km_s2(), vector::ZERO);
    }
}
