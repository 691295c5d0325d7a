//! Physical constants in SI units, plus helpers for setting up circular
//! orbits.
//!
//! Planetary values follow the NSSDC planetary fact sheets.

/// Gravitational constant (m^3 kg^-1 s^-2).
pub const G: f64 = 6.6743e-11;

/// One astronomical unit (m).
pub const AU: f64 = 1.495978707e11;

// Masses (kg)
pub const M_SUN: f64 = 1.989e30;
pub const M_EARTH: f64 = 5.972e24;
pub const M_MARS: f64 = 0.64171e24;
pub const M_MOON: f64 = 0.07346e24;

// Mean radii (m)
pub const R_SUN: f64 = 6.95700e8;
pub const R_EARTH: f64 = 6.3781e6;
pub const R_MARS: f64 = 3396.2e3;
pub const R_MOON: f64 = 1738.1e3;

// Mean distance from the Sun (m)
pub const D_EARTH: f64 = AU;
pub const D_MARS: f64 = 1.524 * AU;

// Mean orbital speed (m/s)
pub const V_EARTH: f64 = 29.78e3;
pub const V_MARS: f64 = 24.07e3;

/// Speed of a circular orbit of radius `radius` around a body with
/// gravitational parameter `gm` (G times the central mass).
pub fn circular_orbit_speed(gm: f64, radius: f64) -> f64 {
    (gm / radius).sqrt()
}

/// Period of a circular orbit of radius `radius`, in seconds.
pub fn orbital_period(gm: f64, radius: f64) -> f64 {
    2.0 * std::f64::consts::PI * (radius.powi(3) / gm).sqrt()
}
