use serde::{Deserialize, Serialize};

/// Runtime parameters derived from the configuration, used by the step loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunParams {
    // Universe
    pub time_scale: u32, // Seconds represented by one step
    pub gravitational_constant: f64,
    pub parallel_forces: bool,

    // Time
    pub total_steps: u64,
    pub simulated_seconds: f64, // total_steps * time_scale

    // Output
    pub save_traces: bool,
    pub trace_stride: usize,
    pub points_per_trace: usize, // Points each exported trace will hold
}
