//! Scheduled velocity changes for thrust-capable bodies.

use log::warn;
use std::fmt;
use trajectory_common::KickConfig;

/// One scheduled, instantaneous change of a rocket's velocity.
///
/// `angle_degrees` is counter-clockwise. It is measured from the body's
/// current heading, or from the world +x axis when `static_frame` is set or
/// the body is at rest. An additive kick adds `speed` along that direction;
/// a multiplicative kick rotates the current velocity and scales it by
/// `speed`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kicker {
    pub angle_degrees: f64,
    pub speed: f64,
    pub time: u64,
    pub multiplicative: bool,
    pub static_frame: bool,
}

impl Kicker {
    /// An additive kick in the body's own frame.
    pub fn new(angle_degrees: f64, speed: f64, time: u64) -> Self {
        Kicker {
            angle_degrees,
            speed,
            time,
            multiplicative: false,
            static_frame: false,
        }
    }

    pub fn multiplicative(mut self) -> Self {
        self.multiplicative = true;
        self
    }

    pub fn static_frame(mut self) -> Self {
        self.static_frame = true;
        self
    }
}

impl From<&KickConfig> for Kicker {
    fn from(config: &KickConfig) -> Self {
        Kicker {
            angle_degrees: config.angle,
            speed: config.speed,
            time: config.time,
            multiplicative: config.multiplicative,
            static_frame: config.static_frame,
        }
    }
}

impl fmt::Display for Kicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "kick(angle={}°, speed={}, time={}, {}, {})",
            self.angle_degrees,
            self.speed,
            self.time,
            if self.multiplicative { "multiplicative" } else { "additive" },
            if self.static_frame { "static frame" } else { "relative frame" },
        )
    }
}

/// Kicks ordered by ascending time, at most one per time value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KickQueue {
    kicks: Vec<Kicker>,
}

impl KickQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts each kick at its sorted position.
    ///
    /// A kick whose time is already taken is dropped with a warning.
    /// Returns how many kicks were accepted.
    pub fn schedule<I>(&mut self, kicks: I) -> usize
    where
        I: IntoIterator<Item = Kicker>,
    {
        let mut accepted = 0;
        for kick in kicks {
            match self.kicks.binary_search_by_key(&kick.time, |k| k.time) {
                Ok(_) => warn!(
                    "Several kick events cannot be set to the same time. Skipping the event {}.",
                    kick
                ),
                Err(index) => {
                    self.kicks.insert(index, kick);
                    accepted += 1;
                }
            }
        }
        accepted
    }

    /// Removes and returns the earliest kick if it is due exactly at `time`.
    pub fn pop_due(&mut self, time: u64) -> Option<Kicker> {
        match self.kicks.first() {
            Some(next) if next.time == time => Some(self.kicks.remove(0)),
            _ => None,
        }
    }

    pub fn peek(&self) -> Option<&Kicker> {
        self.kicks.first()
    }

    pub fn len(&self) -> usize {
        self.kicks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kicks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Kicker> {
        self.kicks.iter()
    }
}
