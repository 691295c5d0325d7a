//! Bodies moving under gravity.
//!
//! A [`Body`] carries the kinematic state shared by every simulated object.
//! What it can do on its own is decided by its [`BodyKind`]: stationary
//! bodies (stars, planets, moons) only fall, thrust-capable bodies (rockets)
//! additionally fire scheduled kicks.

use crate::error::SimError;
use crate::kicker::{KickQueue, Kicker};
use log::{debug, warn};
use trajectory_common::{Vector2D, VectorError};

/// The closed set of body capabilities.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyKind {
    /// Cannot propel itself.
    Stationary,
    /// Can receive kicks, fired from its own queue.
    ThrustCapable(KickQueue),
}

#[derive(Debug, Clone)]
pub struct Body {
    name: String,
    mass: f64,

    pub(crate) position: Vector2D,
    pub(crate) velocity: Vector2D,
    pub(crate) acceleration: Vector2D,

    // Per-second values the working state is rebuilt from.
    position_init: Vector2D,
    velocity_init: Vector2D,
    acceleration_init: Vector2D,

    time_scale: u32,
    trace: Vec<(i64, i64)>,
    kind: BodyKind,
}

impl Body {
    fn new(name: impl Into<String>, mass: f64, kind: BodyKind) -> Result<Self, SimError> {
        let name = name.into();
        if !(mass.is_finite() && mass > 0.0) {
            return Err(SimError::InvalidMass { name, mass });
        }
        Ok(Body {
            name,
            mass,
            position: Vector2D::ZERO,
            velocity: Vector2D::ZERO,
            acceleration: Vector2D::ZERO,
            position_init: Vector2D::ZERO,
            velocity_init: Vector2D::ZERO,
            acceleration_init: Vector2D::ZERO,
            time_scale: 1,
            trace: Vec::new(),
            kind,
        })
    }

    /// A star, planet or moon.
    pub fn planet(name: impl Into<String>, mass: f64) -> Result<Self, SimError> {
        Self::new(name, mass, BodyKind::Stationary)
    }

    /// A body that can manoeuvre with kicks.
    pub fn rocket(name: impl Into<String>, mass: f64) -> Result<Self, SimError> {
        Self::new(name, mass, BodyKind::ThrustCapable(KickQueue::new()))
    }

    /// Sets the initial position (m).
    pub fn with_position(mut self, position: Vector2D) -> Self {
        self.position_init = position;
        self.reset_movement();
        self
    }

    /// Sets the initial velocity (m/s).
    pub fn with_velocity(mut self, velocity: Vector2D) -> Self {
        self.velocity_init = velocity;
        self.reset_movement();
        self
    }

    /// Sets the initial acceleration (m/s²).
    pub fn with_acceleration(mut self, acceleration: Vector2D) -> Self {
        self.acceleration_init = acceleration;
        self.reset_movement();
        self
    }

    /// Restores position, velocity and acceleration from the initial values,
    /// expressed in units of the current time scale.
    pub fn reset_movement(&mut self) {
        let spi = self.time_scale as f64;
        self.position = self.position_init;
        self.velocity = self.velocity_init * spi;
        self.acceleration = self.acceleration_init * (spi * spi);
    }

    pub(crate) fn set_time_scale(&mut self, time_scale: u32) {
        self.time_scale = time_scale;
    }

    /// Records the current position, then takes one step.
    pub(crate) fn step(&mut self) {
        let spi = self.time_scale as f64;
        self.trace.push(self.position.as_rounded_point());
        self.velocity = self.velocity + self.acceleration * (spi * spi);
        self.position = self.position + self.velocity;
    }

    /// Queues kicks on a rocket. Returns how many were accepted.
    ///
    /// Stationary bodies cannot be kicked; their kicks are dropped with a
    /// warning.
    pub fn schedule<I>(&mut self, kicks: I) -> usize
    where
        I: IntoIterator<Item = Kicker>,
    {
        match &mut self.kind {
            BodyKind::ThrustCapable(queue) => queue.schedule(kicks),
            BodyKind::Stationary => {
                let dropped = kicks.into_iter().count();
                warn!(
                    "'{}' is stationary and cannot be kicked. Skipping {} kick event(s).",
                    self.name, dropped
                );
                0
            }
        }
    }

    /// Fires the earliest queued kick if it is due exactly at `time`.
    ///
    /// Returns whether a kick was applied. Stationary bodies never kick.
    pub fn apply_due_kick(&mut self, time: u64) -> Result<bool, SimError> {
        let kick = match &mut self.kind {
            BodyKind::ThrustCapable(queue) => match queue.pop_due(time) {
                Some(kick) => kick,
                None => return Ok(false),
            },
            BodyKind::Stationary => return Ok(false),
        };

        let direction = match self.velocity.normalized() {
            Ok(heading) if !kick.static_frame => heading,
            Ok(_) => Vector2D::RIGHT,
            Err(VectorError::ZeroNormalization) => Vector2D::RIGHT,
            Err(e) => return Err(e.into()),
        };

        let before = self.velocity;
        if kick.multiplicative {
            self.velocity = self.velocity.rotate(kick.angle_degrees) * kick.speed;
        } else {
            let spi = self.time_scale as f64;
            let delta = (direction * (kick.speed * spi)).rotate(kick.angle_degrees);
            self.velocity = self.velocity + delta;
        }
        debug!(
            "'{}' fired {} at time {}: velocity {} -> {}",
            self.name, kick, time, before, self.velocity
        );
        Ok(true)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn position(&self) -> Vector2D {
        self.position
    }

    /// Velocity in metres per step.
    pub fn velocity(&self) -> Vector2D {
        self.velocity
    }

    /// Acceleration in metres per second squared, as computed by the last
    /// force phase. Before the first step it is the initial acceleration
    /// scaled per step by [`Body::reset_movement`].
    pub fn acceleration(&self) -> Vector2D {
        self.acceleration
    }

    pub fn time_scale(&self) -> u32 {
        self.time_scale
    }

    /// One rounded point per step taken.
    pub fn trace(&self) -> &[(i64, i64)] {
        &self.trace
    }

    pub fn kind(&self) -> &BodyKind {
        &self.kind
    }

    pub fn can_kick(&self) -> bool {
        matches!(self.kind, BodyKind::ThrustCapable(_))
    }

    /// "planet" or "rocket".
    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            BodyKind::Stationary => "planet",
            BodyKind::ThrustCapable(_) => "rocket",
        }
    }

    /// Kicks still waiting to fire.
    pub fn pending_kicks(&self) -> usize {
        match &self.kind {
            BodyKind::ThrustCapable(queue) => queue.len(),
            BodyKind::Stationary => 0,
        }
    }
}
