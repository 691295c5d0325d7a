//! Two-dimensional Newtonian gravity for a handful of planets and rockets.
//!
//! Build [`Body`] values, add them to a [`Universe`], [`Universe::lock`] it and
//! call [`Universe::advance`] once per step. Each body keeps a trace of its
//! rounded positions for rendering afterwards.

pub mod body;
pub mod error;
pub mod kicker;
pub mod output;
pub mod scenario;
pub mod universe;

pub use body::{Body, BodyKind};
pub use error::SimError;
pub use kicker::{KickQueue, Kicker};
pub use universe::Universe;
pub use trajectory_common::{Vector2D, VectorError};
