use std::path::PathBuf;
use serde::{Deserialize, Serialize};

/// Measurements of one synthesis run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepResult {
    pub factor: u32,
    pub latency: u64,   // Total execution time in cycles
    pub ff: u64,        // Flip-flops
    pub lut: u64,       // Look-up tables
}

/// How the sweep was parameterized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub user_code: PathBuf,
    pub top_function: String,
    pub unrolled_loop_name: String,
    pub partitioned_array_name: String,
}

/// The durable output of a sweep.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    pub metadata: Metadata,
    pub results: Vec<SweepResult>,
}
