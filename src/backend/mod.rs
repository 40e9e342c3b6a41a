// The synthesis backend seam.
//
// The sweep only needs two things from an HLS tool: the list of candidate
// loops, and for each unroll factor a latency & resource report. Everything
// else about driving the tool lives behind the `Backend` trait.

pub mod template;
mod vitis;
#[cfg(test)]
pub(crate) mod stub;

pub use vitis::VitisBackend;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::Result;

// Candidate pass:

pub struct CandidateInput<'a> {
    pub work_dir: &'a Path,
    pub user_code: &'a Path,
    pub top_function: &'a str,
}

// Synthesis:

/// Everything needed to synthesize the design for one unroll factor.
#[derive(Clone, Debug)]
pub struct SynthInput {
    pub work_dir: PathBuf,
    pub namespace: String,      // Project directory owned by this invocation
    pub user_code: PathBuf,
    pub top_function: String,
    pub loop_name: String,
    pub factor: u32,
    pub array_name: String,
}

/// Report locations of a finished synthesis run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SynthOutput {
    pub latency_report: PathBuf,
    pub resource_report: PathBuf,
}

impl SynthInput {
    /// Testbench that accompanies the user code: `dir/name.cpp` -> `dir/name_test.cpp`.
    pub fn user_tb(&self) -> PathBuf {
        companion_test_source(&self.user_code)
    }

    /// Directory all of this invocation's artifacts are written to.
    pub fn project_dir(&self) -> PathBuf {
        self.work_dir.join(&self.namespace)
    }

    /// Where the backend places the reports for this invocation.
    pub fn expected_output(&self) -> SynthOutput {
        let solution = self.project_dir().join("solution");
        SynthOutput {
            latency_report: solution.join("sim/report/verilog/lat.rpt"),
            resource_report: solution.join("solution_data.json"),
        }
    }
}

pub fn companion_test_source(user_code: &Path) -> PathBuf {
    let stem = user_code.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    let name = match user_code.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_test.{}", stem, ext),
        None => format!("{}_test", stem),
    };
    user_code.with_file_name(name)
}

pub type AnyBackend = Arc<dyn Backend + Send + Sync>;

pub trait Backend {
    /// Run the candidate pass over the user code & return the path of the
    /// candidate report it wrote.
    fn find_candidates(&self, input: CandidateInput) -> Result<PathBuf>;

    /// Synthesize & simulate the design for one unroll factor, blocking until
    /// the tool exits. Writes only inside `input.project_dir()`.
    fn synthesize(&self, input: &SynthInput) -> Result<SynthOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(user_code: &str) -> SynthInput {
        SynthInput {
            work_dir: PathBuf::from("/work"),
            namespace: "proj4".to_string(),
            user_code: PathBuf::from(user_code),
            top_function: "top".to_string(),
            loop_name: "ELSE_LOOP".to_string(),
            factor: 4,
            array_name: "acc".to_string(),
        }
    }

    #[test]
    fn test_user_tb() {
        assert_eq!(input("src/hotloop.cpp").user_tb(), PathBuf::from("src/hotloop_test.cpp"));
        assert_eq!(input("hotloop").user_tb(), PathBuf::from("hotloop_test"));
    }

    #[test]
    fn test_expected_output() {
        let out = input("hotloop.cpp").expected_output();
        assert_eq!(out.latency_report,
                   PathBuf::from("/work/proj4/solution/sim/report/verilog/lat.rpt"));
        assert_eq!(out.resource_report,
                   PathBuf::from("/work/proj4/solution/solution_data.json"));
    }
}
