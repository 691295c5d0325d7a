use serde::{Deserialize, Serialize};
use anyhow::Result;
use crate::constants;
use crate::run_params::RunParams;
use std::collections::HashSet;
use std::path::Path;

// Configuration for universe properties
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct UniverseConfig {
    /// Seconds represented by one simulation step (spi).
    pub time_scale: u32,
    #[serde(default = "default_gravitational_constant")]
    pub gravitational_constant: f64,
    #[serde(default)]
    pub parallel_forces: bool,
}

// Configuration for timing
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    pub total_steps: u64,
}

// Configuration for output settings, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub base_filename: String,
    pub save_traces: bool,
    pub format: Option<String>, // Output format: "json", "bincode", "messagepack", "csv"
    #[serde(default = "default_trace_stride")]
    pub trace_stride: usize, // Keep every n-th trace point on export
}

fn default_trace_stride() -> usize {
    1
}

fn default_gravitational_constant() -> f64 {
    constants::G
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKindConfig {
    Planet,
    Rocket,
}

/// One scheduled kick, as written in the configuration.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct KickConfig {
    pub angle: f64,
    pub speed: f64,
    pub time: u64,
    #[serde(default)]
    pub multiplicative: bool,
    #[serde(default)]
    pub static_frame: bool,
}

/// Initial state of one body.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct BodyConfig {
    pub name: String,
    pub kind: BodyKindConfig,
    pub mass: f64,
    #[serde(default)]
    pub position: Option<[f64; 2]>,
    #[serde(default)]
    pub velocity: Option<[f64; 2]>,
    #[serde(default)]
    pub acceleration: Option<[f64; 2]>,
    /// Rotates both position and velocity about the origin before the run,
    /// handy for placing a planet elsewhere along its orbit.
    #[serde(default)]
    pub rotate_degrees: Option<f64>,
    #[serde(default)]
    pub kicks: Vec<KickConfig>,
}

/// A seeded field of extra planets drawn from normal distributions.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RandomFieldConfig {
    pub count: u32,
    pub seed: u64,
    pub mass: f64,
    pub position_std_dev: f64,
    #[serde(default)]
    pub velocity_std_dev: f64,
}

/// Reports when two bodies line up as seen from a center body.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AlignmentConfig {
    pub first: String,
    pub second: String,
    pub center: String,
    #[serde(default = "default_tolerance_degrees")]
    pub tolerance_degrees: f64,
}

fn default_tolerance_degrees() -> f64 {
    1.0
}

// Main scenario configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub universe: UniverseConfig,
    pub timing: TimingConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
    #[serde(default)]
    pub random_field: Option<RandomFieldConfig>,
    #[serde(default)]
    pub alignments: Vec<AlignmentConfig>,
}

impl ScenarioConfig {
    /// Loads the scenario configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| {
                anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e)
            })?;
        let config = Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config in '{}': {}", path_ref.display(), e))?;

        log::debug!(
            "Loaded scenario with {} configured bodies from {}",
            config.bodies.len(),
            path_ref.display()
        );
        Ok(config)
    }

    /// Parses and validates a configuration held in memory.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: ScenarioConfig = toml::from_str(config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the invariants the engine relies on.
    pub fn validate(&self) -> Result<()> {
        if self.universe.time_scale == 0 {
            anyhow::bail!("time_scale must be at least 1.");
        }
        let g = self.universe.gravitational_constant;
        if !(g.is_finite() && g > 0.0) {
            anyhow::bail!("gravitational_constant must be positive.");
        }
        if self.timing.total_steps == 0 {
            anyhow::bail!("total_steps must be greater than 0.");
        }
        if self.output.trace_stride == 0 {
            anyhow::bail!("trace_stride must be at least 1.");
        }

        let field_count = self.random_field.as_ref().map_or(0, |f| f.count);
        if self.bodies.is_empty() && field_count == 0 {
            anyhow::bail!("The scenario needs at least one body or a non-empty random_field.");
        }

        for body in &self.bodies {
            if !(body.mass.is_finite() && body.mass > 0.0) {
                anyhow::bail!("Body '{}' must have a positive mass, got {}.", body.name, body.mass);
            }
            if body.kind == BodyKindConfig::Planet && !body.kicks.is_empty() {
                anyhow::bail!("Body '{}' is a planet and cannot be given kicks.", body.name);
            }
        }

        if let Some(field) = &self.random_field {
            if !(field.mass.is_finite() && field.mass > 0.0) {
                anyhow::bail!("random_field.mass must be positive.");
            }
            // A zero spread stacks every field body on the same point.
            if !(field.position_std_dev.is_finite() && field.position_std_dev > 0.0) {
                anyhow::bail!("random_field.position_std_dev must be positive.");
            }
            if !(field.velocity_std_dev.is_finite() && field.velocity_std_dev >= 0.0) {
                anyhow::bail!("random_field.velocity_std_dev must not be negative.");
            }
        }

        let names: HashSet<&str> = self.bodies.iter().map(|b| b.name.as_str()).collect();
        for watch in &self.alignments {
            for name in [&watch.first, &watch.second, &watch.center] {
                if !names.contains(name.as_str()) {
                    anyhow::bail!("Alignment watch refers to unknown body '{}'.", name);
                }
            }
        }

        Ok(())
    }

    /// Converts the configuration into parameters used at runtime.
    pub fn run_params(&self) -> RunParams {
        let total_steps = self.timing.total_steps;
        let trace_stride = self.output.trace_stride.max(1);
        let points_per_trace = (total_steps as usize).div_ceil(trace_stride);

        RunParams {
            time_scale: self.universe.time_scale,
            gravitational_constant: self.universe.gravitational_constant,
            parallel_forces: self.universe.parallel_forces,
            total_steps,
            simulated_seconds: total_steps as f64 * self.universe.time_scale as f64,
            save_traces: self.output.save_traces,
            trace_stride,
            points_per_trace,
        }
    }
}
