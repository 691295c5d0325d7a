//! Error types for the trajectory engine.

use std::fmt;
use trajectory_common::VectorError;

/// Errors that abort a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// `lock()` was called on a universe without bodies.
    NoBodies,
    /// `advance()` was called before the universe was locked.
    NotReady,
    /// A body was constructed with a mass that is not a positive number.
    InvalidMass { name: String, mass: f64 },
    /// Vector arithmetic failed, e.g. two bodies share the exact same position.
    Vector(VectorError),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::NoBodies => write!(
                f,
                "Cannot lock an empty universe. Add at least one planet or rocket first."
            ),
            SimError::NotReady => write!(f, "The universe must be locked before it can advance."),
            SimError::InvalidMass { name, mass } => {
                write!(f, "Body '{}' must have a positive mass, got {}", name, mass)
            }
            SimError::Vector(e) => write!(f, "Vector arithmetic failed: {}", e),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Vector(e) => Some(e),
            _ => None,
        }
    }
}

impl From<VectorError> for SimError {
    fn from(e: VectorError) -> Self {
        SimError::Vector(e)
    }
}
