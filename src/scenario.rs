//! Turning a scenario configuration into a ready-to-lock universe, and the
//! per-step checks a driver runs while the universe advances.

use crate::body::Body;
use crate::kicker::Kicker;
use crate::universe::Universe;
use anyhow::{Context, Result};
use log::{debug, info};
use rand::prelude::*;
use rand_distr::Normal;
use trajectory_common::{
    AlignmentConfig, BodyConfig, BodyKindConfig, RandomFieldConfig, ScenarioConfig, Vector2D,
};

/// Builds an unlocked universe holding every configured body.
pub fn build_universe(config: &ScenarioConfig) -> Result<Universe> {
    let mut universe =
        Universe::new().with_gravitational_constant(config.universe.gravitational_constant);
    universe.set_time_scale(config.universe.time_scale);
    universe.set_parallel(config.universe.parallel_forces);

    let mut bodies = Vec::with_capacity(config.bodies.len());
    for body_config in &config.bodies {
        bodies.push(build_body(body_config)?);
    }
    universe.add(bodies);

    if let Some(field) = &config.random_field {
        universe.add(random_field(field)?);
    }

    info!("Scenario built with {} bodies.", universe.len());
    Ok(universe)
}

fn build_body(config: &BodyConfig) -> Result<Body> {
    let body = match config.kind {
        BodyKindConfig::Planet => Body::planet(config.name.as_str(), config.mass),
        BodyKindConfig::Rocket => Body::rocket(config.name.as_str(), config.mass),
    }
    .with_context(|| format!("Failed to create body '{}'", config.name))?;

    let rotation = config.rotate_degrees.unwrap_or(0.0);
    let place = |v: Option<[f64; 2]>| {
        let v = v.map(Vector2D::from).unwrap_or(Vector2D::ZERO);
        if rotation == 0.0 { v } else { v.rotate(rotation) }
    };

    let mut body = body
        .with_position(place(config.position))
        .with_velocity(place(config.velocity))
        .with_acceleration(config.acceleration.map(Vector2D::from).unwrap_or(Vector2D::ZERO));

    if !config.kicks.is_empty() {
        let accepted = body.schedule(config.kicks.iter().map(Kicker::from));
        debug!("'{}' scheduled {}/{} kicks", config.name, accepted, config.kicks.len());
    }
    Ok(body)
}

/// Draws a reproducible field of planets around the origin.
pub fn random_field(config: &RandomFieldConfig) -> Result<Vec<Body>> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let position_dist = Normal::new(0.0, config.position_std_dev)
        .context("Invalid random_field.position_std_dev")?;
    let velocity_dist = Normal::new(0.0, config.velocity_std_dev)
        .context("Invalid random_field.velocity_std_dev")?;

    let mut bodies = Vec::with_capacity(config.count as usize);
    for i in 0..config.count {
        let position = Vector2D::new(rng.sample(position_dist), rng.sample(position_dist));
        let velocity = Vector2D::new(rng.sample(velocity_dist), rng.sample(velocity_dist));
        let body = Body::planet(format!("field-{}", i), config.mass)?
            .with_position(position)
            .with_velocity(velocity);
        bodies.push(body);
    }
    Ok(bodies)
}

/// A check run by the driver after every step. Observers only read state.
pub trait StepObserver {
    fn observe(&mut self, time: u64, universe: &Universe);
}

/// What an [`AlignmentWatch`] saw at one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Both bodies sit at the same angle around the center.
    Aligned,
    /// The bodies sit on opposite sides of the center.
    Opposite,
}

/// Reports when two bodies line up as seen from a center body.
///
/// Angular positions are compared in degrees. Consecutive steps inside the
/// tolerance each report, so a slow passage reports several times.
#[derive(Debug, Clone)]
pub struct AlignmentWatch {
    first: String,
    second: String,
    center: String,
    tolerance_degrees: f64,
    events: Vec<(u64, Alignment)>,
}

impl AlignmentWatch {
    pub fn new(first: &str, second: &str, center: &str, tolerance_degrees: f64) -> Self {
        AlignmentWatch {
            first: first.to_string(),
            second: second.to_string(),
            center: center.to_string(),
            tolerance_degrees,
            events: Vec::new(),
        }
    }

    /// Classifies the current configuration, if it is aligned or opposite.
    pub fn check(&self, universe: &Universe) -> Option<Alignment> {
        let center = universe.find(&self.center)?.position();
        let first = (universe.find(&self.first)?.position() - center).angle_degrees();
        let second = (universe.find(&self.second)?.position() - center).angle_degrees();

        // Wrapped to [0, 180]
        let separation = (first - second).rem_euclid(360.0);
        let separation = separation.min(360.0 - separation);

        if separation < self.tolerance_degrees {
            Some(Alignment::Aligned)
        } else if (180.0 - separation) < self.tolerance_degrees {
            Some(Alignment::Opposite)
        } else {
            None
        }
    }

    pub fn events(&self) -> &[(u64, Alignment)] {
        &self.events
    }
}

impl From<&AlignmentConfig> for AlignmentWatch {
    fn from(config: &AlignmentConfig) -> Self {
        AlignmentWatch::new(&config.first, &config.second, &config.center, config.tolerance_degrees)
    }
}

impl StepObserver for AlignmentWatch {
    fn observe(&mut self, time: u64, universe: &Universe) {
        if let Some(alignment) = self.check(universe) {
            match alignment {
                Alignment::Aligned => info!(
                    "{} and {} aligned around {} at time = {}",
                    self.first, self.second, self.center, time
                ),
                Alignment::Opposite => info!(
                    "{} and {} opposite of each other around {} at time = {}",
                    self.first, self.second, self.center, time
                ),
            }
            self.events.push((time, alignment));
        }
    }
}

/// Observers requested by the configuration.
pub fn observers(config: &ScenarioConfig) -> Vec<Box<dyn StepObserver>> {
    config
        .alignments
        .iter()
        .map(|a| Box::new(AlignmentWatch::from(a)) as Box<dyn StepObserver>)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use trajectory_common::constants::{self, AU};

    const MARS_TRANSFER: &str = r#"
        [universe]
        time_scale = 3600

        [timing]
        total_steps = 50000

        [output]
        base_filename = "mars_transfer"
        save_traces = false

        [[bodies]]
        name = "Sun"
        kind = "planet"
        mass = 1.989e30

        [[bodies]]
        name = "Earth"
        kind = "planet"
        mass = 5.972e24
        position = [1.495978707e11, 0.0]
        velocity = [0.0, 29780.0]

        [[bodies]]
        name = "Mars"
        kind = "planet"
        mass = 0.64171e24
        position = [2.279871549468e11, 0.0]
        velocity = [0.0, 24070.0]
        rotate_degrees = 47.0

        [[bodies]]
        name = "Go!"
        kind = "rocket"
        mass = 1.0e4
        position = [1.495978707e11, 6.3781e7]
        velocity = [0.0, 34580.0]

        [[bodies.kicks]]
        angle = 0.0
        speed = 2650.0
        time = 6000

        [[bodies.kicks]]
        angle = 90.0
        speed = 10.0
        time = 6000

        [[alignments]]
        first = "Earth"
        second = "Mars"
        center = "Sun"
    "#;

    #[test]
    fn builds_bodies_in_configured_order() {
        let config = ScenarioConfig::from_toml_str(MARS_TRANSFER).unwrap();
        let universe = build_universe(&config).unwrap();
        let names: Vec<&str> = universe.bodies().iter().map(|b| b.name()).collect();
        assert_eq!(names, vec!["Sun", "Earth", "Mars", "Go!"]);
        assert_eq!(universe.time_scale(), 3600);
        assert!(!universe.is_locked());
        assert_eq!(universe.gravitational_constant(), constants::G);
    }

    #[test]
    fn duplicate_kick_times_in_config_keep_the_first() {
        let config = ScenarioConfig::from_toml_str(MARS_TRANSFER).unwrap();
        let universe = build_universe(&config).unwrap();
        let rocket = universe.find("Go!").unwrap();
        assert!(rocket.can_kick());
        assert_eq!(rocket.pending_kicks(), 1);
    }

    #[test]
    fn rotation_places_mars_along_its_orbit() {
        let config = ScenarioConfig::from_toml_str(MARS_TRANSFER).unwrap();
        let universe = build_universe(&config).unwrap();
        let mars = universe.find("Mars").unwrap();
        assert!((mars.position().angle_degrees() - 47.0).abs() < 1e-6);
        assert!((mars.position().magnitude() - 1.524 * AU).abs() < 1.0);
        assert!((mars.velocity().angle_degrees() - 137.0).abs() < 1e-6);
    }

    #[test]
    fn random_field_is_reproducible() {
        let field = RandomFieldConfig {
            count: 5,
            seed: 7,
            mass: 1e20,
            position_std_dev: 1e9,
            velocity_std_dev: 10.0,
        };
        let a = random_field(&field).unwrap();
        let b = random_field(&field).unwrap();
        assert_eq!(a.len(), 5);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.position(), y.position());
            assert_eq!(x.velocity(), y.velocity());
        }
        assert_eq!(a[3].name(), "field-3");
    }

    fn three_in_a_row(second_at: Vector2D) -> Universe {
        let mut universe = Universe::new();
        universe.add([
            Body::planet("Sun", 1.0).unwrap(),
            Body::planet("Earth", 1.0).unwrap().with_position(Vector2D::new(1.0, 0.0)),
            Body::planet("Mars", 1.0).unwrap().with_position(second_at),
        ]);
        universe
    }

    #[test]
    fn alignment_watch_classifies_positions() {
        let watch = AlignmentWatch::new("Earth", "Mars", "Sun", 1.0);
        let aligned = three_in_a_row(Vector2D::new(1.5, 0.01));
        let opposite = three_in_a_row(Vector2D::new(-1.5, 0.01));
        assert_eq!(watch.check(&aligned), Some(Alignment::Aligned));
        assert_eq!(watch.check(&opposite), Some(Alignment::Opposite));
        assert_eq!(watch.check(&three_in_a_row(Vector2D::new(0.0, 1.5))), None);
    }

    #[test]
    fn alignment_handles_angle_wrap_around() {
        let watch = AlignmentWatch::new("Earth", "Mars", "Sun", 1.0);
        let mut universe = three_in_a_row(Vector2D::new(1.5, -0.01));
        universe.find_mut("Earth").unwrap().position = Vector2D::new(1.0, 0.001).rotate(180.0);
        assert_eq!(watch.check(&universe), Some(Alignment::Opposite));
    }

    #[test]
    fn alignment_watch_records_events() {
        let mut watch = AlignmentWatch::new("Earth", "Mars", "Sun", 1.0);
        let universe = three_in_a_row(Vector2D::new(2.0, 0.0));
        watch.observe(12, &universe);
        assert_eq!(watch.events(), &[(12, Alignment::Aligned)]);
    }

    #[test]
    fn unknown_body_never_aligns() {
        let watch = AlignmentWatch::new("Earth", "Pluto", "Sun", 1.0);
        assert_eq!(watch.check(&three_in_a_row(Vector2D::new(2.0, 0.0))), None);
    }
}
