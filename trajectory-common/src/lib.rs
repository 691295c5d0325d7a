pub mod config;
pub mod constants;
pub mod run_params;
pub mod trace;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{
    AlignmentConfig, BodyConfig, BodyKindConfig, KickConfig, OutputConfig, RandomFieldConfig,
    ScenarioConfig, TimingConfig, UniverseConfig,
};
pub use run_params::RunParams;
pub use trace::TraceRecord;
pub use vecmath::{Vector2D, VectorError};
