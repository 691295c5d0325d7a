use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Errors raised by fallible vector arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorError {
    /// A vector was divided by a scalar that is exactly zero.
    DivideByZero,
    /// A zero-magnitude vector has no direction to normalize to.
    ///
    /// Callers that can fall back to a default direction match on this
    /// variant specifically; it is not a generic arithmetic failure.
    ZeroNormalization,
}

impl fmt::Display for VectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VectorError::DivideByZero => write!(f, "Attempted to divide a vector by zero"),
            VectorError::ZeroNormalization => {
                write!(f, "Attempted to normalize a zero vector")
            }
        }
    }
}

impl std::error::Error for VectorError {}

/// Number of decimal digits kept by [`Vector2D::rotate`].
const ROTATION_DECIMALS: f64 = 1e6;

/// An immutable 2D vector.
///
/// Arithmetic never mutates an operand; every operation returns a new value.
/// Equality is exact component-wise float equality.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    /// The zero vector.
    pub const ZERO: Vector2D = Vector2D { x: 0.0, y: 0.0 };
    /// The world-frame reference direction (east / rightward).
    pub const RIGHT: Vector2D = Vector2D { x: 1.0, y: 0.0 };

    /// Creates a new Vector2D.
    pub const fn new(x: f64, y: f64) -> Self {
        Vector2D { x, y }
    }

    /// Calculates the squared length (magnitude) of the vector.
    pub fn magnitude_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Euclidean norm.
    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Scales the vector by a scalar value.
    pub fn scale(&self, scalar: f64) -> Self {
        Vector2D::new(self.x * scalar, self.y * scalar)
    }

    /// Divides both components by `scalar`, refusing an exact zero divisor.
    pub fn divide(&self, scalar: f64) -> Result<Self, VectorError> {
        if scalar == 0.0 {
            return Err(VectorError::DivideByZero);
        }
        Ok(Vector2D::new(self.x / scalar, self.y / scalar))
    }

    /// Returns a unit vector with the same direction.
    ///
    /// Fails with [`VectorError::ZeroNormalization`] for the zero vector.
    pub fn normalized(&self) -> Result<Self, VectorError> {
        self.divide(self.magnitude())
            .map_err(|_| VectorError::ZeroNormalization)
    }

    /// Rotates counter-clockwise by `angle_degrees`.
    ///
    /// Components are rounded to six decimals so that repeated rotations do
    /// not accumulate floating-point drift.
    pub fn rotate(&self, angle_degrees: f64) -> Self {
        let (sin_theta, cos_theta) = angle_degrees.to_radians().sin_cos();
        let x = self.x * cos_theta - self.y * sin_theta;
        let y = self.x * sin_theta + self.y * cos_theta;
        Vector2D::new(round_to_decimals(x), round_to_decimals(y))
    }

    /// Angle of the vector in degrees, measured counter-clockwise from +x.
    pub fn angle_degrees(&self) -> f64 {
        self.y.atan2(self.x).to_degrees()
    }

    /// Lossy integer projection used for traces and plotting only.
    pub fn as_rounded_point(&self) -> (i64, i64) {
        (self.x.round_ties_even() as i64, self.y.round_ties_even() as i64)
    }

    /// Calculates the distance to another vector (point).
    pub fn distance(&self, other: Vector2D) -> f64 {
        (*self - other).magnitude()
    }
}

/// Above this magnitude an `f64` has no fractional digits left to round.
const ROUNDING_LIMIT: f64 = 9_007_199_254_740_992.0 / ROTATION_DECIMALS;

fn round_to_decimals(value: f64) -> f64 {
    if value.abs() >= ROUNDING_LIMIT {
        return value;
    }
    (value * ROTATION_DECIMALS).round_ties_even() / ROTATION_DECIMALS
}

impl fmt::Display for Vector2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<[f64; 2]> for Vector2D {
    fn from(components: [f64; 2]) -> Self {
        Vector2D::new(components[0], components[1])
    }
}

// Implement standard operators for convenience
impl Add for Vector2D {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self { x: self.x + other.x, y: self.y + other.y }
    }
}

impl Sub for Vector2D {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self { x: self.x - other.x, y: self.y - other.y }
    }
}

impl Neg for Vector2D {
    type Output = Self;
    fn neg(self) -> Self {
        Self { x: -self.x, y: -self.y }
    }
}

impl Mul<f64> for Vector2D {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        self.scale(scalar)
    }
}

impl Mul<Vector2D> for f64 {
    type Output = Vector2D;
    fn mul(self, vector: Vector2D) -> Vector2D {
        vector.scale(self)
    }
}
