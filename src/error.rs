// Error types for hot-loop selection and unroll sweeps

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("candidate report: malformed record '{0}' (expected 'name min_line max_line')")]
    MalformedRecord(String),

    #[error("hot loop selection: no candidate loops were found by the analysis pass")]
    NoCandidates,

    #[error("hot loop selection: no trace files were found in the solution directory")]
    NoTraces,

    #[error("hot loop selection: malformed trace file {path:?}: {reason}")]
    MalformedTrace { path: PathBuf, reason: String },

    #[error("candidate pass failed: {0}")]
    CandidatePassFailed(String),

    #[error("sweep: backend invocation failed for unroll factor {factor}: {reason}")]
    BackendInvocationFailed { factor: u32, reason: String },

    #[error("sweep: backend timed out for unroll factor {factor}")]
    BackendTimeout { factor: u32 },

    #[error("sweep: malformed latency report for unroll factor {factor}")]
    MalformedLatencyReport { factor: u32 },

    #[error("sweep: malformed resource report for unroll factor {factor}: {reason}")]
    MalformedResourceReport { factor: u32, reason: String },

    #[error("efficiency: zero latency or resource count for unroll factor {factor}")]
    DegenerateMetric { factor: u32 },

    #[error("efficiency: baseline record is missing from the sweep results")]
    MissingBaseline,

    #[error("results artifact: {0}")]
    MalformedArtifact(String),

    #[error("template error: {0}")]
    Template(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}
