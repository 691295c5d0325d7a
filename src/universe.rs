use crate::body::Body;
use crate::error::SimError;
use log::{debug, info, trace, warn};
use rayon::prelude::*;
use trajectory_common::{constants, Vector2D};

/// Owns every body and advances them together under mutual gravity.
///
/// A universe is configured first (bodies, time scale, force mode) and then
/// locked; only a locked universe can advance.
#[derive(Debug, Clone)]
pub struct Universe {
    bodies: Vec<Body>,
    /// Seconds represented by one step (spi).
    time_scale: u32,
    gravitational_constant: f64,
    parallel: bool,
    locked: bool,
}

impl Default for Universe {
    fn default() -> Self {
        Self::new()
    }
}

impl Universe {
    /// An empty universe with a time scale of one second per step.
    pub fn new() -> Self {
        Universe {
            bodies: Vec::new(),
            time_scale: 1,
            gravitational_constant: constants::G,
            parallel: false,
            locked: false,
        }
    }

    /// Replaces the gravitational constant, e.g. for natural units.
    pub fn with_gravitational_constant(mut self, g: f64) -> Self {
        self.gravitational_constant = g;
        self
    }

    /// Adds bodies in order. Ignored with a warning once locked.
    pub fn add<I>(&mut self, bodies: I)
    where
        I: IntoIterator<Item = Body>,
    {
        if self.locked {
            warn!("The universe is already locked. Skipping adding bodies.");
            return;
        }
        for body in bodies {
            debug!(
                "Adding {} '{}' (mass {:e} kg)",
                body.kind_label(),
                body.name(),
                body.mass()
            );
            self.bodies.push(body);
        }
    }

    /// Sets how many seconds pass per step. Ignored with a warning once
    /// locked, or when zero.
    pub fn set_time_scale(&mut self, time_scale: u32) {
        if self.locked {
            warn!("The simulation of the universe already started. Not re-setting the time scale.");
            return;
        }
        if time_scale == 0 {
            warn!(
                "A time scale of zero seconds per step would freeze the universe. Keeping {}.",
                self.time_scale
            );
            return;
        }
        self.time_scale = time_scale;
    }

    /// Selects the rayon force phase. Ignored with a warning once locked.
    pub fn set_parallel(&mut self, parallel: bool) {
        if self.locked {
            warn!("The universe is already locked. Not changing the force mode.");
            return;
        }
        self.parallel = parallel;
    }

    /// Ends the configuration phase.
    ///
    /// Pushes the time scale to every body and resets their motion from the
    /// initial values. Fails if there are no bodies.
    pub fn lock(&mut self) -> Result<(), SimError> {
        if self.bodies.is_empty() {
            return Err(SimError::NoBodies);
        }
        if self.locked {
            warn!("The universe is already locked. Not resetting body state.");
            return Ok(());
        }
        for body in self.bodies.iter_mut() {
            body.set_time_scale(self.time_scale);
            body.reset_movement();
        }
        self.locked = true;
        info!(
            "Universe locked with {} bodies at {} s per step ({} force phase).",
            self.bodies.len(),
            self.time_scale,
            if self.parallel { "parallel" } else { "sequential" }
        );
        Ok(())
    }

    /// Advances every body by one step.
    ///
    /// Accelerations for all bodies are computed from the same snapshot of
    /// positions before any body moves. Rockets then fire a kick if one is
    /// due at `time`.
    pub fn advance(&mut self, time: u64) -> Result<(), SimError> {
        if !self.locked {
            return Err(SimError::NotReady);
        }

        // --- 1. Force phase ---
        let accelerations = if self.parallel {
            (0..self.bodies.len())
                .into_par_iter()
                .map(|idx| self.net_acceleration(idx))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            (0..self.bodies.len())
                .map(|idx| self.net_acceleration(idx))
                .collect::<Result<Vec<_>, _>>()?
        };
        for (body, acceleration) in self.bodies.iter_mut().zip(accelerations) {
            body.acceleration = acceleration;
        }

        // --- 2. Motion phase ---
        for body in self.bodies.iter_mut() {
            body.step();
            if body.can_kick() {
                body.apply_due_kick(time)?;
            }
        }

        trace!("Advanced universe to time {}", time);
        Ok(())
    }

    /// Sum of the gravitational pulls of all other bodies on body `idx`.
    ///
    /// Two bodies at the exact same position have no direction between them
    /// and the normalization error is returned as is.
    fn net_acceleration(&self, idx: usize) -> Result<Vector2D, SimError> {
        let target = &self.bodies[idx];
        let mut net = Vector2D::ZERO;
        for (other_idx, other) in self.bodies.iter().enumerate() {
            if other_idx == idx {
                continue;
            }
            let distance = other.position - target.position;
            let pull = self.gravitational_constant * other.mass() / distance.magnitude_squared();
            net = net + distance.normalized()? * pull;
        }
        Ok(net)
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    pub fn body_mut(&mut self, index: usize) -> Option<&mut Body> {
        self.bodies.get_mut(index)
    }

    /// First body with the given name.
    pub fn find(&self, name: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.name() == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.name() == name)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn time_scale(&self) -> u32 {
        self.time_scale
    }

    pub fn gravitational_constant(&self) -> f64 {
        self.gravitational_constant
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kicker::Kicker;
    use trajectory_common::VectorError;

    fn two_planets() -> Universe {
        let mut universe = Universe::new().with_gravitational_constant(1.0);
        universe.add([
            Body::planet("A", 1.0).unwrap().with_position(Vector2D::new(-1.0, 0.0)),
            Body::planet("B", 1.0).unwrap().with_position(Vector2D::new(1.0, 0.0)),
        ]);
        universe
    }

    #[test]
    fn locking_empty_universe_fails() {
        let mut universe = Universe::new();
        assert_eq!(universe.lock(), Err(SimError::NoBodies));
        assert!(!universe.is_locked());
    }

    #[test]
    fn advance_before_lock_fails() {
        let mut universe = two_planets();
        assert_eq!(universe.advance(0), Err(SimError::NotReady));
        assert!(universe.bodies().iter().all(|b| b.trace().is_empty()));
    }

    #[test]
    fn lock_then_advance_succeeds() {
        let mut universe = two_planets();
        universe.lock().unwrap();
        assert!(universe.advance(0).is_ok());
        assert!(universe.advance(1).is_ok());
    }

    #[test]
    fn acceleration_is_antisymmetric() {
        let mut universe = two_planets();
        universe.lock().unwrap();
        universe.advance(0).unwrap();
        let a = universe.bodies()[0].acceleration();
        let b = universe.bodies()[1].acceleration();
        println!("A: {}, B: {}", a, b);
        assert_eq!(a, Vector2D::new(0.25, 0.0));
        assert_eq!(a, -b);
    }

    #[test]
    fn force_phase_replaces_the_initial_acceleration() {
        let mut universe = Universe::new().with_gravitational_constant(1.0);
        universe.add([
            Body::planet("A", 1.0)
                .unwrap()
                .with_position(Vector2D::new(-1.0, 0.0))
                .with_acceleration(Vector2D::new(0.5, 0.0)),
            Body::planet("B", 1.0).unwrap().with_position(Vector2D::new(1.0, 0.0)),
        ]);
        universe.set_time_scale(2);
        universe.lock().unwrap();
        assert_eq!(universe.bodies()[0].acceleration(), Vector2D::new(2.0, 0.0));
        universe.advance(0).unwrap();
        assert_eq!(universe.bodies()[0].acceleration(), Vector2D::new(0.25, 0.0));
    }

    #[test]
    fn acceleration_depends_on_other_mass_only() {
        let mut universe = Universe::new().with_gravitational_constant(1.0);
        universe.add([
            Body::planet("Heavy", 1e5).unwrap(),
            Body::planet("Light", 1e-5).unwrap().with_position(Vector2D::new(1.0, 0.0)),
        ]);
        universe.lock().unwrap();
        universe.advance(0).unwrap();
        assert!(universe.bodies()[0].acceleration().magnitude() < 1e-4);
        assert!((universe.bodies()[1].acceleration().x + 1e5).abs() < 1e-6);
    }

    #[test]
    fn changes_after_lock_are_ignored() {
        let mut universe = two_planets();
        universe.set_time_scale(10);
        universe.lock().unwrap();
        universe.add([Body::planet("Late", 1.0).unwrap()]);
        universe.set_time_scale(99);
        universe.set_parallel(true);
        assert_eq!(universe.len(), 2);
        assert_eq!(universe.time_scale(), 10);
        assert!(!universe.is_parallel());
        assert!(universe.bodies().iter().all(|b| b.time_scale() == 10));
    }

    #[test]
    fn zero_time_scale_is_ignored() {
        let mut universe = two_planets();
        universe.set_time_scale(0);
        assert_eq!(universe.time_scale(), 1);
    }

    #[test]
    fn lock_propagates_time_scale_into_velocity() {
        let mut universe = Universe::new();
        universe.add([Body::rocket("Go!", 1.0).unwrap().with_velocity(Vector2D::new(2.0, 0.0))]);
        universe.set_time_scale(60);
        universe.lock().unwrap();
        assert_eq!(universe.bodies()[0].velocity(), Vector2D::new(120.0, 0.0));
    }

    #[test]
    fn relocking_does_not_reset_state() {
        let mut universe = Universe::new();
        universe.add([Body::rocket("Go!", 1.0).unwrap().with_velocity(Vector2D::new(1.0, 0.0))]);
        universe.lock().unwrap();
        universe.advance(0).unwrap();
        universe.lock().unwrap();
        assert_eq!(universe.bodies()[0].position(), Vector2D::new(1.0, 0.0));
    }

    #[test]
    fn single_body_drifts_in_a_straight_line() {
        let mut universe = Universe::new();
        universe.add([Body::planet("Lonely", 1.0).unwrap().with_velocity(Vector2D::new(1.0, 2.0))]);
        universe.lock().unwrap();
        for time in 0..3 {
            universe.advance(time).unwrap();
        }
        let lonely = &universe.bodies()[0];
        assert_eq!(lonely.position(), Vector2D::new(3.0, 6.0));
        assert_eq!(lonely.trace(), &[(0, 0), (1, 2), (2, 4)]);
    }

    #[test]
    fn coincident_bodies_are_a_singularity() {
        let mut universe = Universe::new();
        universe.add([Body::planet("A", 1.0).unwrap(), Body::planet("B", 1.0).unwrap()]);
        universe.lock().unwrap();
        assert_eq!(
            universe.advance(0),
            Err(SimError::Vector(VectorError::ZeroNormalization))
        );
    }

    #[test]
    fn universe_fires_due_kicks_after_moving() {
        let mut universe = Universe::new();
        let mut rocket = Body::rocket("Go!", 1.0).unwrap();
        rocket.schedule([Kicker::new(0.0, 2.0, 1).static_frame()]);
        universe.add([rocket]);
        universe.lock().unwrap();

        universe.advance(0).unwrap();
        assert_eq!(universe.bodies()[0].velocity(), Vector2D::ZERO);
        universe.advance(1).unwrap();
        assert_eq!(universe.bodies()[0].velocity(), Vector2D::new(2.0, 0.0));
        assert_eq!(universe.bodies()[0].position(), Vector2D::ZERO);
        universe.advance(2).unwrap();
        assert_eq!(universe.bodies()[0].position(), Vector2D::new(2.0, 0.0));
    }

    #[test]
    fn parallel_force_phase_matches_sequential() {
        let build = |parallel: bool| {
            let mut universe = Universe::new().with_gravitational_constant(1.0);
            universe.add((0..6).map(|i| {
                let angle = i as f64 * 60.0;
                Body::planet(format!("P{}", i), 1.0 + i as f64)
                    .unwrap()
                    .with_position(Vector2D::new(10.0 + i as f64, 0.0).rotate(angle))
                    .with_velocity(Vector2D::new(0.0, 0.1).rotate(angle))
            }));
            universe.set_parallel(parallel);
            universe.lock().unwrap();
            for time in 0..50 {
                universe.advance(time).unwrap();
            }
            universe
        };
        let sequential = build(false);
        let parallel = build(true);
        for (s, p) in sequential.bodies().iter().zip(parallel.bodies()) {
            assert_eq!(s.position(), p.position());
            assert_eq!(s.trace(), p.trace());
        }
    }

    #[test]
    fn find_by_name() {
        let mut universe = two_planets();
        assert_eq!(universe.find("B").map(|b| b.mass()), Some(1.0));
        assert!(universe.find("C").is_none());
        let accepted = universe.find_mut("A").map(|b| b.schedule([Kicker::new(0.0, 1.0, 0)]));
        assert_eq!(accepted, Some(0));
    }
}
