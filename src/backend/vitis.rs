use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use log::{debug, info, warn};

use super::template::{render, synth_values};
use super::{Backend, CandidateInput, SynthInput, SynthOutput};
use crate::config;
use crate::error::{Error, Result};

/// Exit code of `timeout` when the command ran out of time.
const TIMED_OUT: i32 = 124;

/// Drives Vitis HLS (or any tool taking `<script> -l <log>`) as a subprocess.
pub struct VitisBackend {
    command: String,
    candidate_script: PathBuf,
    candidate_log: PathBuf,
    candidate_report: PathBuf,
    template: String,
    timeout: Option<u64>,
}

impl VitisBackend {
    /// Create a backend using the already loaded script TEMPLATE.
    pub fn new(config: &config::Backend, template: String) -> Self {
        Self {
            command: config.command.clone(),
            candidate_script: config.candidate_script.clone(),
            candidate_log: config.candidate_log.clone(),
            candidate_report: config.candidate_report.clone(),
            template,
            timeout: config.timeout,
        }
    }

    /// Create a backend, loading the template named in CONFIG.
    pub fn from_config(config: &config::Backend) -> Result<Self> {
        let template = fs::read_to_string(&config.template).map_err(|e| {
            Error::Template(format!("unable to read {:?}: {}", config.template, e))
        })?;
        return Ok(Self::new(config, template));
    }

    /// The backend command, wrapped with `timeout` if a limit is set.
    fn command(&self, script: &Path, log: &Path, work_dir: &Path) -> Command {
        let mut cmd = match self.timeout {
            Some(secs) => {
                let mut c = Command::new("timeout");
                c.arg(secs.to_string()).arg(&self.command);
                c
            },
            None => Command::new(&self.command),
        };
        cmd.arg(script)
           .arg("-l")
           .arg(log)
           .current_dir(work_dir)
           .stdin(Stdio::null())
           .stdout(Stdio::null())
           .stderr(Stdio::null());
        cmd
    }

    fn timed_out(&self, status: &ExitStatus) -> bool {
        self.timeout.is_some() && status.code() == Some(TIMED_OUT)
    }
}

impl Backend for VitisBackend {
    /// Run the candidate pass. The pass reads the user code & top function
    /// from the environment.
    fn find_candidates(&self, input: CandidateInput) -> Result<PathBuf> {
        info!(
            "Running the candidate pass on {:?} with top-level function '{}'",
            input.user_code, input.top_function
        );

        let status = self.command(&self.candidate_script, &self.candidate_log, input.work_dir)
            .env("HOT_LOOP_USER_CODE", input.user_code)
            .env("HOT_LOOP_TOP_FUNCTION", input.top_function)
            .status()
            .map_err(|e| {
                Error::CandidatePassFailed(format!("unable to launch '{}': {}", self.command, e))
            })?;

        if self.timed_out(&status) {
            return Err(Error::CandidatePassFailed("timed out".to_string()));
        }
        if !status.success() {
            return Err(Error::CandidatePassFailed(format!(
                "'{}' exited with {}, see {:?}", self.command, status, self.candidate_log
            )));
        }

        return Ok(input.work_dir.join(&self.candidate_report));
    }

    fn synthesize(&self, input: &SynthInput) -> Result<SynthOutput> {
        let factor = input.factor;
        let failed = |reason: String| Error::BackendInvocationFailed { factor, reason };
        info!("Trying unroll factor {} in {}", factor, input.namespace);

        // Stale reports from an earlier sweep must not be mistaken for ours
        let project = input.project_dir();
        if project.exists() {
            warn!("Removing pre-existing project at {:?}", project);
            fs::remove_dir_all(&project).map_err(|e| failed(e.to_string()))?;
        }

        // The script must be complete on disk before the backend starts
        let script = render(&self.template, &synth_values(input))?;
        let mut file = tempfile::Builder::new()
            .prefix("unroll-")
            .suffix(".tcl")
            .tempfile()?;
        file.write_all(script.as_bytes())?;
        file.flush()?;
        file.as_file().sync_all()?;
        debug!("Script for unroll factor {} at {:?}:\n{}", factor, file.path(), script);

        // Run & block until the backend exits
        let log = PathBuf::from(format!("vitis_hls_{}.log", input.namespace));
        info!("Launching '{}' for unroll factor {}", self.command, factor);
        let status = self.command(file.path(), &log, &input.work_dir)
            .status()
            .map_err(|e| failed(format!("unable to launch '{}': {}", self.command, e)))?;
        drop(file);

        if self.timed_out(&status) {
            return Err(Error::BackendTimeout { factor });
        }
        if !status.success() {
            return Err(failed(format!(
                "'{}' exited with {}, see {:?}", self.command, status, input.work_dir.join(&log)
            )));
        }

        // The reports must exist for the run to count
        let output = input.expected_output();
        for report in [&output.latency_report, &output.resource_report] {
            if !report.is_file() {
                return Err(failed(format!("missing report {:?}", report)));
            }
        }

        info!("Done with unroll factor {}", factor);
        return Ok(output);
    }
}
