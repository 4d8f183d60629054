//! Point-mass central body with any number of spacecraft, advanced on a fixed step.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use burnsim_core::StateVector;
use burnsim_core::time::TimeScale;
use burnsim_core::vector::{self, Vector3};
use burnsim_guidance::{Actuator, BodyId, StateSource};
use burnsim_propulsion::Vehicle;
use log::warn;

use crate::SimError;

/// A vehicle and its state relative to the central body.
#[derive(Debug, Clone)]
pub struct Body {
    pub vehicle: Vehicle,
    pub state: StateVector,
}

/// Two-body world integrated with velocity Verlet. Thrust is held constant across a step.
#[derive(Debug, Clone)]
pub struct TwoBodyWorld {
    mu_km3_s2: f64,
    step_s: f64,
    time: f64,
    steps: u64,
    time_scale: TimeScale,
    bodies: Vec<Body>,
}

impl TwoBodyWorld {
    pub fn new(mu_km3_s2: f64, step_s: f64) -> Result<Self, SimError> {
        if !(mu_km3_s2.is_finite() && mu_km3_s2 > 0.0) {
            return Err(SimError::InvalidWorld(format!(
                "gravitational parameter must be positive (got {mu_km3_s2})"
            )));
        }
        if !(step_s.is_finite() && step_s > 0.0) {
            return Err(SimError::InvalidWorld(format!(
                "step must be positive (got {step_s})"
            )));
        }
        Ok(Self {
            mu_km3_s2,
            step_s,
            time: 0.0,
            steps: 0,
            time_scale: TimeScale::identity(),
            bodies: Vec::new(),
        })
    }

    /// Report elapsed time in simulation units scaled by `time_scale`.
    pub fn with_time_scale(mut self, time_scale: TimeScale) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn add_body(&mut self, vehicle: Vehicle, state: StateVector) -> BodyId {
        self.bodies.push(Body { vehicle, state });
        BodyId(self.bodies.len() - 1)
    }

    pub fn mu_km3_s2(&self) -> f64 {
        self.mu_km3_s2
    }

    pub fn step_s(&self) -> f64 {
        self.step_s
    }

    /// Elapsed physical seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn sim_time(&self) -> f64 {
        self.time_scale.world_seconds_to_sim(self.time)
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.0)
    }

    /// Advance every body by one fixed step.
    pub fn step(&mut self) {
        let dt = self.step_s;
        let mu = self.mu_km3_s2;
        for body in &mut self.bodies {
            let thrust = body.vehicle.thrust_acceleration_km_s2();
            let r0 = body.state.position_km;
            let v0 = body.state.velocity_km_s;

            let a0 = vector::add(&gravity(&r0, mu), &thrust);
            let v_half = vector::add(&v0, &vector::scale(&a0, 0.5 * dt));
            let r1 = vector::add(&r0, &vector::scale(&v_half, dt));
            let a1 = vector::add(&gravity(&r1, mu), &thrust);
            let v1 = vector::add(&v_half, &vector::scale(&a1, 0.5 * dt));

            body.state = StateVector::new(r1, v1);
            let mass = body.vehicle.mass_kg;
            if let Some(thruster) = body.vehicle.thruster.as_mut() {
                thruster.record_step(mass, dt);
            }
        }
        self.time += dt;
        self.steps += 1;
    }
}

fn gravity(r: &Vector3, mu: f64) -> Vector3 {
    let r_mag = vector::norm(r);
    if r_mag <= 0.0 {
        return vector::ZERO;
    }
    vector::scale(r, -mu / r_mag.powi(3))
}

/// Shared single-threaded handle so the integrator and the controller's collaborators see
/// one world.
#[derive(Debug, Clone)]
pub struct WorldHandle(Rc<RefCell<TwoBodyWorld>>);

impl WorldHandle {
    pub fn new(world: TwoBodyWorld) -> Self {
        Self(Rc::new(RefCell::new(world)))
    }

    pub fn borrow(&self) -> Ref<'_, TwoBodyWorld> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, TwoBodyWorld> {
        self.0.borrow_mut()
    }

    pub fn step(&self) {
        self.0.borrow_mut().step();
    }
}

impl StateSource for WorldHandle {
    fn state(&self, body: BodyId) -> Option<StateVector> {
        self.0.borrow().body(body).map(|b| b.state)
    }

    fn physical_time(&self) -> f64 {
        self.0.borrow().sim_time()
    }
}

impl Actuator for WorldHandle {
    fn apply_impulse(&mut self, body: BodyId, delta_v_km_s: Vector3) {
        if !vector::is_finite(&delta_v_km_s) {
            warn!("rejecting non-finite impulse {delta_v_km_s:?} for body {body}");
            return;
        }
        match self.0.borrow_mut().body_mut(body) {
            Some(b) => b.state.velocity_km_s = vector::add(&b.state.velocity_km_s, &delta_v_km_s),
            None => warn!("impulse for unknown body {body} dropped"),
        }
    }

    fn set_thrust_axis(&mut self, body: BodyId, axis: Vector3) {
        let mut world = self.0.borrow_mut();
        match world.body_mut(body).and_then(|b| b.vehicle.thruster.as_mut()) {
            Some(thruster) => thruster.set_axis(axis),
            None => warn!("body {body} has no thruster to aim"),
        }
    }

    fn set_engine_enabled(&mut self, body: BodyId, enabled: bool) {
        let mut world = self.0.borrow_mut();
        match world.body_mut(body).and_then(|b| b.vehicle.thruster.as_mut()) {
            Some(thruster) => thruster.set_enabled(enabled),
            None => warn!("body {body} has no thruster to switch"),
        }
    }

    fn delivered_delta_v(&self, body: BodyId) -> Option<f64> {
        self.0
            .borrow()
            .body(body)
            .and_then(|b| b.vehicle.thruster.as_ref())
            .map(|t| t.delivered_delta_v_km_s())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use burnsim_core::constants::MU_EARTH_KM3_S2;
    use burnsim_orbits::{circular_state, elements_from_state};
    use burnsim_propulsion::Thruster;

    #[test]
    fn circular_orbit_stays_circular() {
        let mut world = TwoBodyWorld::new(MU_EARTH_KM3_S2, 1.0).unwrap();
        let start = circular_state(7_000.0, MU_EARTH_KM3_S2);
        let id = world.add_body(Vehicle::new("sat", 500.0), start);
        // Roughly one full revolution.
        for _ in 0..5_828 {
            world.step();
        }
        let state = world.body(id).unwrap().state;
        let el = elements_from_state(&state, MU_EARTH_KM3_S2);
        assert_relative_eq!(state.radius_km(), 7_000.0, epsilon = 0.05);
        assert!(el.eccentricity < 1e-5, "e = {}", el.eccentricity);
        assert_relative_eq!(world.time(), 5_828.0, epsilon = 1e-6);
    }

    #[test]
    fn actuator_adds_impulse_and_rejects_nan() {
        let handle = WorldHandle::new(TwoBodyWorld::new(MU_EARTH_KM3_S2, 0.1).unwrap());
        let id = handle
            .borrow_mut()
            .add_body(Vehicle::new("sat", 500.0), circular_state(7_000.0, MU_EARTH_KM3_S2));
        let before = handle.state(id).unwrap().velocity_km_s;

        let mut actuator = handle.clone();
        actuator.apply_impulse(id, [0.0, 0.1, 0.0]);
        actuator.apply_impulse(id, [f64::NAN, 0.0, 0.0]);
        actuator.apply_impulse(BodyId(42), [1.0, 0.0, 0.0]);

        let after = handle.state(id).unwrap().velocity_km_s;
        assert_relative_eq!(after[1] - before[1], 0.1, epsilon = 1e-12);
        assert_eq!(after[0], before[0]);
        assert!(handle.state(BodyId(42)).is_none());
    }

    #[test]
    fn engine_accelerates_against_exhaust_axis() {
        let mut world = TwoBodyWorld::new(MU_EARTH_KM3_S2, 0.1).unwrap();
        let vehicle = Vehicle::new("sat", 1_000.0).with_thruster(Thruster::new(1_000.0));
        let id = world.add_body(vehicle, circular_state(7_000.0, MU_EARTH_KM3_S2));
        let handle = WorldHandle::new(world);
        let mut actuator = handle.clone();
        actuator.set_engine_enabled(id, true);
        actuator.set_thrust_axis(id, [0.0, -1.0, 0.0]);

        let speed0 = handle.state(id).unwrap().speed_km_s();
        for _ in 0..100 {
            handle.step();
        }
        let speed1 = handle.state(id).unwrap().speed_km_s();
        // 1 m/s² for 10 s, prograde.
        assert!(speed1 - speed0 > 0.009, "speed gain {}", speed1 - speed0);
        assert_relative_eq!(actuator.delivered_delta_v(id).unwrap(), 0.01, epsilon = 1e-9);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(TwoBodyWorld::new(0.0, 0.1).is_err());
        assert!(TwoBodyWorld::new(MU_EARTH_KM3_S2, -1.0).is_err());
    }
}
